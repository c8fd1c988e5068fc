use actix_web::web::{self};

pub mod routes {
    pub mod pay;
}

pub mod services {
    pub mod pay;
}

pub mod dtos {
    pub mod pay;
}

pub fn mount_pay() -> actix_web::Scope {
    web::scope("/payments").service(routes::pay::post_stk)
}

/// Mounted outside the auth guard; the gateway calls back unauthenticated.
pub fn mount_webhook() -> actix_web::Scope {
    web::scope("/pay").service(routes::pay::post_webhook)
}
