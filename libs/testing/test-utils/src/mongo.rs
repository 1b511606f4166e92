//! MongoDB test infrastructure

use mongodb::{Client, Database};
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

/// MongoDB container with a connected client.
///
/// The container is stopped and removed when this struct is dropped.
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    pub client: Client,
    pub connection_string: String,
}

impl TestMongo {
    /// Start a container and connect to it
    ///
    /// ```no_run
    /// use test_utils::TestMongo;
    ///
    /// # async fn example() {
    /// let mongo = TestMongo::new().await;
    /// let db = mongo.database("calendar_test");
    /// # }
    /// ```
    pub async fn new() -> Self {
        let container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get host port");

        let connection_string = format!("mongodb://127.0.0.1:{host_port}");
        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to connect to test MongoDB");

        tracing::info!(port = host_port, "Test MongoDB ready");

        Self {
            container,
            client,
            connection_string,
        }
    }

    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }
}
