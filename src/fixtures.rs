#[cfg(test)]
pub mod test {
    use serde::Deserialize;

    /// A realistic service configuration exercising comments, both
    /// separators, quoting, escapes, dotted keys and list values.
    pub const SERVICE_CONF: &str = "\
# order service
name = \"order service\"
greeting: 'hello, world  '   # quoted, trailing blanks kept

server.host = 0.0.0.0
server.port = 8080
server.debug = yes
server.mode = fast

database.url = postgres://db:5432/orders
database.pool_size = 020
database.replicas = replica1:5432 ; replica2:5432 ;
ratio = 0.75
";

    /// Inputs the parser must reject.
    pub const REFERENCE_BAD: [&str; 6] = [
        "b c: d",
        "c d",
        " : e",
        "f #: 123",
        "g\\ h: ",
        "h : 'abc\n",
    ];

    #[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Mode {
        Fast,
        Slow,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct ServiceConfig {
        pub name: String,
        pub greeting: String,
        pub ratio: f64,
        pub server: ServerConfig,
        pub database: DatabaseConfig,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
        pub debug: bool,
        pub mode: Mode,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    pub struct DatabaseConfig {
        pub url: Option<String>,
        pub pool_size: usize,
        pub replicas: Vec<String>,
        pub timeout: Option<u32>,
    }

    #[test]
    fn fixture_keys_are_unique() {
        let config = crate::Config::parse(SERVICE_CONF).unwrap();
        let mut keys: Vec<&str> = config.keys().collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }
}
