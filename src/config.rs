pub mod topology {
    pub const AP_FAMILY: &str = "Unified AP";
}

pub mod catalyst {
    pub const AUTH_PATH: &str = "/dna/system/api/v1/auth/token";
    pub const TOPOLOGY_PATH: &str = "/dna/intent/api/v1/topology/physical-topology";
    pub const NETWORK_DEVICE_PATH: &str = "/dna/intent/api/v1/network-device";
    pub const INTERFACE_PATH: &str = "/dna/intent/api/v1/interface";
    pub const SWITCH_FAMILY: &str = "Switches and Hubs";
}

pub mod meraki {
    pub const BASE_URL: &str = "https://api.meraki.com/api/v1";
    pub const PORT_STATUS_TIMESPAN_SECS: u64 = 3600;
    pub const NETWORKS_PER_PAGE: u32 = 100_000;
    pub const DEVICES_PER_PAGE: u32 = 1_000;
    pub const CONNECTED_STATUS: &str = "Connected";
}

pub mod storage {
    pub const POE_LOG_FILE: &str = "poe_database_timeseries.csv";
    pub const PORT_SNAPSHOT_FILE: &str = "port_database.csv";
}

pub mod channels {
    pub const TIMER_CAPACITY: usize = 10;
    pub const RECORDS_CAPACITY: usize = 100;
}

pub mod http {
    pub const USER_AGENT: &str = "poe-saver/0.8";
}
