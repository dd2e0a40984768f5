//! Default values referenced from serde attributes

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8080
}

pub fn default_price_precision() -> u32 {
    2
}

pub fn default_quantity_precision() -> u32 {
    8
}

pub fn default_request_timeout_ms() -> u64 {
    3000
}
