//! Reserved keys and protocol constants for JSON-API documents

/// JSON-API version advertised in the `jsonapi` member.
pub const JSONAPI_VERSION: &str = "1.0";

/// Top-level member holding primary data.
pub const KEY_DATA: &str = "data";
/// Top-level member holding sideloaded resources.
pub const KEY_INCLUDED: &str = "included";
/// Top-level (and input envelope) member holding non-standard meta information.
pub const KEY_META: &str = "meta";
/// Member holding links, both document-level and per resource.
pub const KEY_LINKS: &str = "links";
/// Top-level member describing the server implementation.
pub const KEY_JSONAPI: &str = "jsonapi";
/// Member holding a resource's relationships object.
pub const KEY_RELATIONSHIPS: &str = "relationships";
/// Member holding a resource's type.
pub const KEY_TYPE: &str = "type";
/// Member holding a resource's identifier.
pub const KEY_ID: &str = "id";
/// Member holding a resource's attributes.
pub const KEY_ATTRIBUTES: &str = "attributes";
/// Member marking an error document; its presence under `data` bypasses shaping.
pub const KEY_ERRORS: &str = "errors";

/// Internal key the serializer uses to carry extra per-object data.
///
/// It never appears in rendered attributes.
pub const EXTRA_DATA_KEY: &str = "__extra_data";

/// Serialization group that disables sideloading for the whole pass.
pub const SIDELOAD_GROUP: &str = "Sideload";

/// Pagination meta member holding the page offset.
pub const META_OFFSET: &str = "offset";
/// Pagination meta member holding the page size.
pub const META_LIMIT: &str = "limit";
/// Pagination meta member holding the total number of results.
pub const META_TOTAL_RESULTS: &str = "total-results";
/// Pagination link to the first page.
pub const LINK_FIRST: &str = "first";

/// JSON key marking a typed object in the JSON form of an object graph.
pub const NODE_TYPE_KEY: &str = "$type";
/// JSON key marking an offset-paginated representation in the JSON form of an object graph.
pub const NODE_PAGINATED_KEY: &str = "$paginated";

/// Keys a relationship may not be named after, since they are stripped or
/// reserved in resource objects regardless of declarations.
pub const RESERVED_MEMBER_NAMES: [&str; 4] = [KEY_TYPE, KEY_ID, KEY_RELATIONSHIPS, KEY_LINKS];
