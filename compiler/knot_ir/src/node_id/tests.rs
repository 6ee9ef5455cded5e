use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_node_id_index() {
    let id = NodeId::new(7);
    assert_eq!(id.index(), 7);
    assert_eq!(id.raw(), 7);
    assert!(id.is_valid());
}

#[test]
fn test_node_id_default_is_invalid() {
    assert_eq!(NodeId::default(), NodeId::INVALID);
    assert!(!NodeId::INVALID.is_valid());
}

#[test]
fn test_node_id_debug() {
    assert_eq!(format!("{:?}", NodeId::new(3)), "NodeId(3)");
    assert_eq!(format!("{:?}", NodeId::INVALID), "NodeId::INVALID");
}
