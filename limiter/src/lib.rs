use middleware::global::GlobalRateLimit;

pub mod middleware {
    pub mod global;
}

pub fn global_middleware(permits_per_sec: u32) -> GlobalRateLimit {
    GlobalRateLimit::new(permits_per_sec)
}
