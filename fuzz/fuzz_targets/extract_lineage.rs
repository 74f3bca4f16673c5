#![no_main]

use libfuzzer_sys::fuzz_target;
use tracescope_core::{extract_lineage, Dialect, LineageOptions, LineageRequest, QualifierPolicy};

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        let request = LineageRequest::new(sql)
            .with_dialect(Dialect::Mssql)
            .with_options(LineageOptions {
                unresolved_qualifier: QualifierPolicy::LeaveEmpty,
                ..LineageOptions::default()
            });

        let _ = extract_lineage(&request);
    }
});
