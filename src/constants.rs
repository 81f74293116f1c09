//! Application constants
//!
//! Centralized keys, delimiters and defaults shared by the codec, the
//! synchronizer and the preference store.

/// URL codec constants
pub mod codec {
    /// Separator between elements of a string-list field in a query value
    pub const LIST_DELIMITER: char = ',';

    /// Escape character for list elements
    ///
    /// Inside an element `\` is written as `\\` and `,` as `\,`.
    pub const LIST_ESCAPE: char = '\\';
}

/// Persistent preference keys
pub mod prefs {
    /// Selected data API endpoint
    pub const API_ENDPOINT_KEY: &str = "explorer.api_endpoint";

    /// Selected node RPC endpoint
    pub const RPC_ENDPOINT_KEY: &str = "explorer.rpc_endpoint";

    /// Debug category list (`codec,sync,...`), browser builds only
    pub const DEBUG_KEY: &str = "explorer.debug";

    /// Default data API endpoint when nothing is stored or configured
    pub const DEFAULT_API_ENDPOINT: &str = "https://api.hive.blog/hafbe-api";

    /// Default node RPC endpoint when nothing is stored or configured
    pub const DEFAULT_RPC_ENDPOINT: &str = "https://api.hive.blog";

    /// Preference file name under the user's data directory (native)
    pub const PREFS_FILE_NAME: &str = "explorer-params.json";
}

/// Query parameter that toggles debug categories (`?explorer_debug=sync,codec`)
pub const DEBUG_QUERY_PARAM: &str = "explorer_debug";
