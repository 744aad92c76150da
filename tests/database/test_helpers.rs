use lazy_static::lazy_static;
use std::sync::Arc;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio_postgres::{Client, NoTls};

pub struct TestDatabase {
    pub connection_string: String,
    _container: Container<'static, Postgres>
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        lazy_static! {
            static ref DOCKER: Arc<Cli> = Arc::new(Cli::default());
        }

        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        let connection_string = format!(
            "host=localhost port={} user=postgres password=postgres dbname=postgres",
            port
        );

        let client = connect(&connection_string).await?;
        client.batch_execute(include_str!("schema.sql")).await?;

        Ok(TestDatabase {
            connection_string,
            _container: container
        })
    }

    pub async fn get_client(&self) -> Result<Client, Box<dyn std::error::Error>> {
        connect(&self.connection_string).await
    }

    /// Three ranked players with points, one without, five leaderboards.
    ///
    /// Player "1" has scores on every leaderboard, with "l5" played twice.
    pub async fn seed_test_data(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = self.get_client().await?;

        client
            .batch_execute(
                "INSERT INTO players (id, name, rank, pp) VALUES
                 ('1', 'First', 1, 15000),
                 ('2', 'Second', 2, 14000),
                 ('3', NULL, 3, 13000),
                 ('4', 'Inactive', 4, 0);

                 INSERT INTO leaderboards (id, hash, name, mapper, difficulty_name, mode_name,
                                           stars, acc_rating, tech_rating, pass_rating) VALUES
                 ('l1', 'H1', 'Song One', 'Mapper A', 'ExpertPlus', 'Standard', 10.5, 11.0, 9.0, 10.0),
                 ('l2', 'H2', 'Song Two', 'Mapper B', 'Expert', 'Standard', 8.0, 8.5, 7.0, 8.0),
                 ('l3', 'H3', 'Song Three', 'Mapper C', 'Hard', 'OneSaber', 5.0, 5.5, 4.0, 5.0),
                 ('l4', 'H4', 'Song Four', 'Mapper A', 'ExpertPlus', 'Standard', 12.0, 12.5, 11.0, 12.0),
                 ('l5', 'H5', 'Song Five', 'Mapper D', 'Normal', 'Standard', 3.0, 3.5, 2.0, 3.0);

                 INSERT INTO scores (player_id, leaderboard_id, pp, timeset) VALUES
                 ('1', 'l1', 500, '2024-01-01 12:00:00+00'),
                 ('1', 'l2', 450, '2024-01-02 12:00:00+00'),
                 ('1', 'l3', 400, '2024-01-03 12:00:00+00'),
                 ('1', 'l4', 350, NULL),
                 ('1', 'l5', 0, '2024-01-04 12:00:00+00'),
                 ('1', 'l5', 0, '2024-02-04 12:00:00+00'),
                 ('2', 'l1', 480, '2024-01-05 12:00:00+00'),
                 ('2', 'l3', 420, '2024-01-06 12:00:00+00'),
                 ('3', 'l2', 300, '2024-01-07 12:00:00+00');"
            )
            .await?;

        Ok(())
    }
}

async fn connect(connection_string: &str) -> Result<Client, Box<dyn std::error::Error>> {
    let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("Database connection error: {}", e);
        }
    });

    Ok(client)
}
