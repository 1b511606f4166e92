//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup
//! - `TestDataBuilder`: deterministic ids, emails and names
//!
//! Container tests need Docker and are marked `#[ignore]`:
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!     let db = mongo.database(&builder.database_name());
//! }
//! ```

use uuid::Uuid;

mod mongo;

pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_delete_series");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic user id; `n` distinguishes users within one test
    pub fn user_id(&self, n: u8) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        uuid_bytes[15] ^= n;
        Uuid::from_bytes(uuid_bytes)
    }

    /// Lowercase email unique to this test
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.email("bob"), "bob-7@test.local");
    /// ```
    pub fn email(&self, local: &str) -> String {
        format!("{}-{}@test.local", local.to_lowercase(), self.seed)
    }

    /// Database name unique to this test, so container tests can share a server
    pub fn database_name(&self) -> String {
        format!("test_{:x}", self.seed)
    }
}
