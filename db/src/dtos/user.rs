use common::misc::UserRole;
use uuid::Uuid;

pub struct UserCreateRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

pub struct CredentialsCreateRequest {
    pub user_id: Uuid,
    pub password_hash: String,
}
