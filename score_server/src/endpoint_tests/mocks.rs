use chrono::{DateTime, Utc};
use mockall::mock;
use score_engine::{
    db_types::{Match, MatchStatus, NewMatch},
    CacheError,
    MatchStore,
    MatchStoreError,
    ResultCache,
};

mock! {
    pub Store {}
    impl MatchStore for Store {
        fn url(&self) -> &str;
        async fn save(&self, new_match: NewMatch) -> Result<Match, MatchStoreError>;
        async fn update(&self, record: &Match) -> Result<Match, MatchStoreError>;
        async fn find_by_id(&self, id: i64) -> Result<Option<Match>, MatchStoreError>;
        async fn list_all(&self) -> Result<Vec<Match>, MatchStoreError>;
        async fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, MatchStoreError>;
        async fn list_by_scheduled_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Match>, MatchStoreError>;
        async fn exists_by_id(&self, id: i64) -> Result<bool, MatchStoreError>;
        async fn delete_by_id(&self, id: i64) -> Result<(), MatchStoreError>;
        async fn count_all(&self) -> Result<i64, MatchStoreError>;
        async fn count_by_status(&self, status: MatchStatus) -> Result<i64, MatchStoreError>;
    }
}

mock! {
    pub Cache {}
    impl ResultCache for Cache {
        async fn put(&self, record: &Match) -> Result<(), CacheError>;
        async fn get(&self, id: i64) -> Result<Option<Match>, CacheError>;
        async fn delete(&self, id: i64) -> Result<(), CacheError>;
        async fn clear(&self) -> Result<(), CacheError>;
        fn is_available(&self) -> bool;
    }
}
