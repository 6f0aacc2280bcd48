use std::{env, env::VarError};

/// The server takes no arguments. If any are given, print the help text and the relevant environment, and tell the
/// caller to exit.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Only print variables known not to hold secrets. Webhook URLs can embed tokens, so that one is masked.
    const DISPLAY_ENVS: [&str; 10] = [
        "RUST_LOG",
        "SCORE_HOST",
        "SCORE_PORT",
        "SCORE_DATABASE_URL",
        "SCORE_DB_MAX_CONNECTIONS",
        "SCORE_RUN_MIGRATIONS",
        "SCORE_CACHE_ENABLED",
        "SCORE_CACHE_TTL",
        "SCORE_EVENT_BUFFER_SIZE",
        "SCORE_CONTENT_SECURITY_POLICY",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    });
    let webhook = if env::var("SCORE_EVENT_WEBHOOK_URL").is_ok() { "Set (hidden)" } else { "Not set" };
    println!("  {:<35} {webhook:<15}", "SCORE_EVENT_WEBHOOK_URL");
}
