//! Service detection based on well-known port numbers.
//!
//! Classification is a two-step chain: the operating system's services
//! database first, then a built-in table of common services. Ports that
//! match neither are labelled [`UNKNOWN_SERVICE`].

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Label used when no source knows the port.
pub const UNKNOWN_SERVICE: &str = "Unknown";

/// Static map of well-known ports to service names.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(20, "FTP-Data");
    m.insert(21, "FTP");
    m.insert(22, "SSH");
    m.insert(23, "Telnet");
    m.insert(25, "SMTP");
    m.insert(53, "DNS");
    m.insert(80, "HTTP");
    m.insert(110, "POP3");
    m.insert(135, "MSRPC");
    m.insert(139, "NetBIOS");
    m.insert(143, "IMAP");
    m.insert(389, "LDAP");
    m.insert(443, "HTTPS");
    m.insert(445, "SMB");
    m.insert(465, "SMTPS");
    m.insert(587, "Submission");
    m.insert(636, "LDAPS");
    m.insert(993, "IMAPS");
    m.insert(995, "POP3S");
    m.insert(1433, "MSSQL");
    m.insert(1521, "Oracle");
    m.insert(2049, "NFS");
    m.insert(3306, "MySQL");
    m.insert(3389, "RDP");
    m.insert(5432, "PostgreSQL");
    m.insert(5900, "VNC");
    m.insert(6379, "Redis");
    m.insert(8080, "HTTP-Proxy");
    m.insert(8443, "HTTPS-Alt");
    m.insert(9200, "Elasticsearch");
    m.insert(11211, "Memcached");
    m.insert(27017, "MongoDB");

    m
});

/// The platform services database, read once per process.
static SYSTEM_SERVICES: LazyLock<Option<Arc<ServiceDatabase>>> =
    LazyLock::new(|| ServiceDatabase::load_system().map(Arc::new));

/// Look up the built-in name for a given port.
///
/// Returns `None` if the port is not in the well-known services table.
pub fn get_service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Port-to-name map in the format of `/etc/services`.
#[derive(Debug, Clone, Default)]
pub struct ServiceDatabase {
    tcp: HashMap<u16, String>,
}

impl ServiceDatabase {
    /// Parse services-file text. Only `tcp` entries are kept and the first
    /// entry for a port wins; aliases and comments are ignored.
    pub fn parse(content: &str) -> Self {
        let mut tcp = HashMap::new();

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or_default();
            let mut fields = line.split_whitespace();

            let (Some(name), Some(port_proto)) = (fields.next(), fields.next()) else {
                continue;
            };
            let Some((port, proto)) = port_proto.split_once('/') else {
                continue;
            };
            if !proto.eq_ignore_ascii_case("tcp") {
                continue;
            }
            if let Ok(port) = port.parse::<u16>() {
                tcp.entry(port).or_insert_with(|| name.to_string());
            }
        }

        Self { tcp }
    }

    /// Read the platform services file, if there is one.
    pub fn load_system() -> Option<Self> {
        let path = system_services_path()?;
        match fs::read_to_string(&path) {
            Ok(content) => {
                let db = Self::parse(&content);
                debug!("loaded {} tcp services from {}", db.len(), path.display());
                Some(db)
            }
            Err(e) => {
                debug!("services database {} unavailable: {e}", path.display());
                None
            }
        }
    }

    pub fn get(&self, port: u16) -> Option<&str> {
        self.tcp.get(&port).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tcp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tcp.is_empty()
    }
}

#[cfg(unix)]
fn system_services_path() -> Option<PathBuf> {
    Some(PathBuf::from("/etc/services"))
}

#[cfg(windows)]
fn system_services_path() -> Option<PathBuf> {
    let root = std::env::var_os("SystemRoot")?;
    Some(
        PathBuf::from(root)
            .join("System32")
            .join("drivers")
            .join("etc")
            .join("services"),
    )
}

#[cfg(not(any(unix, windows)))]
fn system_services_path() -> Option<PathBuf> {
    None
}

/// Best-effort port to service-name mapping.
///
/// Cheap to clone; the database is shared.
#[derive(Debug, Clone, Default)]
pub struct ServiceClassifier {
    database: Option<Arc<ServiceDatabase>>,
}

impl ServiceClassifier {
    /// Classifier consulting the platform services database before the
    /// built-in table.
    pub fn system() -> Self {
        Self {
            database: (*SYSTEM_SERVICES).clone(),
        }
    }

    /// Classifier using only the built-in table.
    pub fn fallback_only() -> Self {
        Self { database: None }
    }

    /// Classifier backed by an explicit database.
    pub fn with_database(database: ServiceDatabase) -> Self {
        Self {
            database: Some(Arc::new(database)),
        }
    }

    /// Label for `port`. Never fails.
    pub fn classify(&self, port: u16) -> String {
        self.database
            .as_deref()
            .and_then(|db| db.get(port))
            .or_else(|| get_service_name(port))
            .unwrap_or(UNKNOWN_SERVICE)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Network services, Internet style
tcpmux          1/tcp                           # TCP port service multiplexer
ssh             22/tcp                          # SSH Remote Login Protocol
domain          53/tcp
domain          53/udp
http            80/tcp          www             # WorldWideWeb HTTP
www-alt         80/tcp
syslog          514/udp
";

    #[test]
    fn test_common_ports() {
        assert_eq!(get_service_name(22), Some("SSH"));
        assert_eq!(get_service_name(80), Some("HTTP"));
        assert_eq!(get_service_name(443), Some("HTTPS"));
        assert_eq!(get_service_name(3306), Some("MySQL"));
    }

    #[test]
    fn test_fallback_table_covers_core_services() {
        let expected = [
            (21, "FTP"),
            (22, "SSH"),
            (23, "Telnet"),
            (25, "SMTP"),
            (53, "DNS"),
            (80, "HTTP"),
            (110, "POP3"),
            (143, "IMAP"),
            (443, "HTTPS"),
            (993, "IMAPS"),
            (995, "POP3S"),
            (3306, "MySQL"),
            (5432, "PostgreSQL"),
            (3389, "RDP"),
        ];
        let classifier = ServiceClassifier::fallback_only();
        for (port, name) in expected {
            assert_eq!(classifier.classify(port), name);
        }
    }

    #[test]
    fn test_unknown_port() {
        assert_eq!(get_service_name(12345), None);
        assert_eq!(
            ServiceClassifier::fallback_only().classify(12345),
            UNKNOWN_SERVICE
        );
    }

    #[test]
    fn test_parse_services_file() {
        let db = ServiceDatabase::parse(SAMPLE);
        assert_eq!(db.get(1), Some("tcpmux"));
        assert_eq!(db.get(22), Some("ssh"));
        assert_eq!(db.get(53), Some("domain"));
        // First entry wins over later duplicates
        assert_eq!(db.get(80), Some("http"));
        // udp-only entries are skipped
        assert_eq!(db.get(514), None);
        assert_eq!(db.len(), 4);
    }

    #[test]
    fn test_parse_ignores_junk_lines() {
        let db = ServiceDatabase::parse("\n   \nbroken\nname notaport/tcp\nfoo 99999/tcp\n");
        assert!(db.is_empty());
    }

    #[test]
    fn test_database_takes_precedence() {
        let classifier = ServiceClassifier::with_database(ServiceDatabase::parse(SAMPLE));
        assert_eq!(classifier.classify(22), "ssh");
        // Not in the database, answered by the built-in table
        assert_eq!(classifier.classify(3389), "RDP");
        assert_eq!(classifier.classify(40000), UNKNOWN_SERVICE);
    }

    #[test]
    fn test_system_classifier_always_labels() {
        let classifier = ServiceClassifier::system();
        assert!(!classifier.classify(22).is_empty());
        assert!(!classifier.classify(65000).is_empty());
    }
}
