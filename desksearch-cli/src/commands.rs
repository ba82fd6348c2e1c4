use anyhow::Result;
use desksearch_core::{Query, RecordStore, RecordType, SearchEngine};
use std::io::Write;

/// Run one query and print the banner, the results and the summary
pub fn execute_search<S: RecordStore>(
    engine: &SearchEngine<S>,
    out: &mut impl Write,
    record_type: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    let record_type: RecordType = record_type.parse()?;
    let lines = engine.search(&Query::new(record_type, field, value))?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Print the searchable fields of one record type, or of all of them
pub fn execute_fields<S: RecordStore>(
    engine: &SearchEngine<S>,
    out: &mut impl Write,
    record_type: Option<&str>,
) -> Result<()> {
    let lines = match record_type {
        Some(name) => engine.list_fields(name.parse::<RecordType>()?)?,
        None => engine.list_all_fields(),
    };
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Compare each collection against its declared fields
pub fn execute_check<S: RecordStore>(engine: &SearchEngine<S>, out: &mut impl Write) -> Result<()> {
    let report = engine.check_schemas()?;

    writeln!(out, "{:<15} {}", "COLLECTION", "STATUS")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for (record_type, drift) in &report {
        writeln!(out, "{:<15} {}", record_type.title(), drift)?;
    }

    let drifted = report.iter().filter(|(_, drift)| !drift.is_clean()).count();
    if drifted > 0 {
        tracing::warn!(drifted, "Collections differ from their declared fields");
    }
    Ok(())
}
