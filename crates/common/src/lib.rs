//! Shared building blocks for the Guhdeh backend crates.
//! - HTTP payload types used by more than one crate
//! - tracing subscriber setup
//! - startup environment checks

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_body_serializes_message_field() {
        let body = types::MessageBody::new("Service deleted successfully");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Service deleted successfully");
    }
}
