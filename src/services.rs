//! Well-known TCP service names.
//!
//! A static stand-in for the system services database, spelled the way
//! `/etc/services` spells them so the banner heuristics can match on names.

/// Look up the well-known service name for a TCP port.
///
/// Returns `None` if the port is not in the table.
pub fn service_name(port: u16) -> Option<&'static str> {
    let name = match port {
        7 => "echo",
        9 => "discard",
        13 => "daytime",
        20 => "ftp-data",
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        37 => "time",
        43 => "whois",
        53 => "domain",
        70 => "gopher",
        79 => "finger",
        80 => "http",
        88 => "kerberos",
        102 => "iso-tsap",
        110 => "pop3",
        111 => "sunrpc",
        113 => "auth",
        119 => "nntp",
        123 => "ntp",
        135 => "epmap",
        139 => "netbios-ssn",
        143 => "imap",
        161 => "snmp",
        179 => "bgp",
        389 => "ldap",
        443 => "https",
        445 => "microsoft-ds",
        464 => "kpasswd",
        465 => "submissions",
        513 => "login",
        514 => "shell",
        515 => "printer",
        543 => "klogin",
        544 => "kshell",
        548 => "afpovertcp",
        554 => "rtsp",
        587 => "submission",
        631 => "ipp",
        636 => "ldaps",
        873 => "rsync",
        989 => "ftps-data",
        990 => "ftps",
        992 => "telnets",
        993 => "imaps",
        995 => "pop3s",
        1080 => "socks",
        1194 => "openvpn",
        1433 => "ms-sql-s",
        1521 => "oracle",
        1723 => "pptp",
        1883 => "mqtt",
        2049 => "nfs",
        2181 => "zookeeper",
        2375 => "docker",
        2376 => "docker-s",
        3128 => "squid-http",
        3306 => "mysql",
        3389 => "ms-wbt-server",
        3690 => "svn",
        4369 => "epmd",
        5060 => "sip",
        5061 => "sip-tls",
        5222 => "xmpp-client",
        5269 => "xmpp-server",
        5432 => "postgresql",
        5672 => "amqp",
        5900 => "rfb",
        6379 => "redis",
        6443 => "sun-sr-https",
        6667 => "ircd",
        8000 => "irdmi",
        8008 => "http-alt",
        8080 => "http-alt",
        8081 => "tproxy",
        8443 => "https-alt",
        8888 => "ddi-tcp-1",
        9000 => "cslistener",
        9042 => "cassandra",
        9092 => "kafka",
        9200 => "wap-wsp",
        9418 => "git",
        10000 => "webmin",
        11211 => "memcache",
        27017 => "mongodb",
        _ => return None,
    };
    Some(name)
}
