//! Shared building blocks for the address book workspace: logging setup
//! and small wire types used by more than one crate.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn health_serializes_as_object() {
        let v = serde_json::to_value(types::Health { status: "ok" }).unwrap();
        assert_eq!(v, serde_json::json!({"status": "ok"}));
    }
}
