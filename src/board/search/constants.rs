//! Search constants.

/// Default number of table entries held before a flush
pub const DEFAULT_TABLE_CAPACITY: usize = 1 << 20;

/// Default ply below which every opponent reply is kept in a retained tree
pub const DEFAULT_REPLY_HORIZON: u32 = 8;

/// Tree ply markers are single base-36 characters
pub const MAX_REPLY_HORIZON: u32 = 36;
