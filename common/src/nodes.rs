/// Resolves a node GUID to the node description configured on the device
/// (usually the host name of an HCA or the name of a switch).
pub trait NodeDescriptionRepository {
    fn describe(&self, guid: &str) -> Option<String>;
}
