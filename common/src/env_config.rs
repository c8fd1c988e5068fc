use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, JWT configuration,
/// server host and port, number of worker threads, CORS settings,
/// file-upload storage settings, the identity-verification service
/// endpoint, and the payment gateway client configuration.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// Process-wide request ceiling, in requests per second.
    pub rate_limit_per_sec: u32,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Directory where uploaded onboarding documents are stored.
    pub upload_dir: String,
    /// Public base URL under which stored documents are served back.
    pub upload_base_url: String,
    /// Base URL of the document/face verification service.
    pub verification_service_url: String,
    /// Configuration for the STK-push payment gateway client.
    pub payment_gateway: PaymentGatewayConfig,
}

#[derive(Clone, Debug)]
/// `PaymentGatewayConfig` holds the configuration necessary for interacting
/// with the mobile-money payment gateway.
///
/// The gateway uses an OAuth 2.0 client-credentials flow: a bearer token is
/// obtained from `auth_url` and then used to POST STK-push requests to
/// `push_url`. The gateway confirms payments asynchronously by calling back
/// to `callback_url`.
pub struct PaymentGatewayConfig {
    /// The client ID (consumer key) for the gateway.
    pub client_id: String,
    /// The client secret (consumer secret) for the gateway.
    pub client_secret: String,
    /// The token endpoint of the gateway.
    pub auth_url: String,
    /// The STK-push endpoint of the gateway.
    pub push_url: String,
    /// The business short code payments are collected under.
    pub business_short_code: String,
    /// The webhook URL the gateway calls back with the payment result.
    pub callback_url: String,
    /// The onboarding fee charged, in whole currency units.
    pub onboarding_fee: u32,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign JWTs and
/// the expiration time in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for JWTs in hours.
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// Reads the JWT configuration from environment variables:
    /// - `JWT_SECRET`: Required. The secret key for JWT signing.
    /// - `JWT_EXPIRATION_HOURS`: Optional. Defaults to 24 hours if not provided.
    ///
    /// # Panics
    ///
    /// This function will panic if:
    /// - `JWT_SECRET` environment variable is not set
    /// - `JWT_EXPIRATION_HOURS` is set but cannot be parsed as a valid number
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        JwtConfig {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Loads all configuration values from environment variables with sensible
    /// defaults for most optional settings.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT signing (via `JwtConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `RATE_LIMIT_PER_SEC`: Global request ceiling (default: 10)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `UPLOAD_DIR`: Document storage directory (default: "./uploads")
    /// - `UPLOAD_BASE_URL`: Public prefix for stored documents
    /// - `VERIFICATION_SERVICE_URL`: Base URL of the face/OCR service
    /// - Payment gateway settings (see implementation for details)
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing
    /// or if numeric values cannot be parsed correctly.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            rate_limit_per_sec: env::var("RATE_LIMIT_PER_SEC")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            upload_base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/uploads".to_string()),
            verification_service_url: env::var("VERIFICATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            payment_gateway: PaymentGatewayConfig {
                client_id: env::var("PAYMENT_CLIENT_ID").unwrap_or_default(),
                client_secret: env::var("PAYMENT_CLIENT_SECRET").unwrap_or_default(),
                auth_url: env::var("PAYMENT_AUTH_URL").unwrap_or_else(|_| {
                    "https://gateway.example.com/oauth2/token".to_string()
                }),
                push_url: env::var("PAYMENT_PUSH_URL").unwrap_or_else(|_| {
                    "https://gateway.example.com/payments/stk-push".to_string()
                }),
                business_short_code: env::var("PAYMENT_SHORT_CODE")
                    .unwrap_or_else(|_| "174379".to_string()),
                callback_url: env::var("PAYMENT_CALLBACK_URL").unwrap_or_else(|_| {
                    "http://localhost:8080/api/pay/webhook".to_string()
                }),
                onboarding_fee: env::var("ONBOARDING_FEE")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()
                    .unwrap_or(2000),
            },
        })
    }
}
