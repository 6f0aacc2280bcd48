use std::fmt::Write;

use anyhow::Result;
use prettytable::{
    format::{LinePosition, LineSeparator, TableFormat},
    row,
    Table,
};
use score_engine::db_types::StatsSummary;
use score_server::data_objects::MatchResponse;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn markdown_format() -> TableFormat {
    prettytable::format::FormatBuilder::new()
        .column_separator('|')
        .borders('|')
        .separator(LinePosition::Title, LineSeparator::new('-', '|', '|', '|'))
        .padding(1, 1)
        .build()
}

pub fn format_matches(matches: &[MatchResponse]) -> String {
    if matches.is_empty() {
        return "No matches".to_string();
    }
    let mut table = Table::new();
    table.set_titles(row!["ID", "Home", "Score", "Away", "Status", "Kick-off (UTC)", "Result"]);
    for m in matches {
        let r = &m.record;
        table.add_row(row![
            r.id,
            r.team_a,
            format!("{} x {}", r.score_a, r.score_b),
            r.team_b,
            r.status,
            r.scheduled_at.format(TIME_FORMAT),
            m.result,
        ]);
    }
    table.set_format(markdown_format());
    table.to_string()
}

pub fn format_match(m: &MatchResponse) -> Result<String> {
    let r = &m.record;
    let mut f = String::new();
    writeln!(f, "Match #{}", r.id)?;
    writeln!(f, "  {} {} x {} {}", r.team_a, r.score_a, r.score_b, r.team_b)?;
    writeln!(f, "  Status:     {}", r.status)?;
    writeln!(f, "  Result:     {}", m.result)?;
    writeln!(f, "  Kick-off:   {}", r.scheduled_at.format(TIME_FORMAT))?;
    writeln!(f, "  Created:    {}", r.created_at.format(TIME_FORMAT))?;
    match r.updated_at {
        Some(t) => writeln!(f, "  Updated:    {}", t.format(TIME_FORMAT))?,
        None => writeln!(f, "  Updated:    never")?,
    }
    Ok(f)
}

pub fn format_stats(stats: &StatsSummary) -> String {
    let mut table = Table::new();
    table.set_titles(row!["Total", "In progress", "Closed"]);
    table.add_row(row![stats.total, stats.in_progress, stats.closed]);
    table.set_format(markdown_format());
    table.to_string()
}
