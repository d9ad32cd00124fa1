#![no_main]

use libfuzzer_sys::fuzz_target;
use mssql_client::Config;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = Config::from_connection_string(s) {
            // Every record built from a parsed config is one the config requests.
            for feature in config.feature_extensions() {
                assert!(config.requests(feature.feature_id));
            }
        }
    }
});
