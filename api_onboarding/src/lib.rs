use actix_web::web::{self};

pub mod steps;
pub mod validation;

pub mod routes {
    pub mod documents;
    pub mod progress;
    pub mod verification;
}

mod services {
    pub(crate) mod progress;
    pub(crate) mod upload;
    pub(crate) mod verification;
}

mod dtos {
    pub(crate) mod onboarding;
}

pub use services::verification::VerificationSessions;

pub fn mount_onboarding() -> actix_web::Scope {
    web::scope("/onboarding")
        .service(routes::progress::get_progress)
        .service(routes::progress::get_steps)
        .service(routes::progress::put_section)
        .service(routes::progress::post_next_step)
        .service(routes::progress::post_prev_step)
        .service(routes::progress::post_goto_step)
        .service(routes::documents::post_document)
        .service(routes::verification::post_session)
        .service(routes::verification::post_verify_face)
        .service(routes::verification::post_verify_medical)
}
