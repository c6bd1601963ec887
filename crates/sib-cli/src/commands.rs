use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use sib_ingest::{CsvSource, CsvTarget};
use sib_model::{DataTarget, RecordTransform, Transformed, Value, head};
use sib_wfs::{HttpService, WfsClient, WfsOptions, WfsSource};

use sib_cli::config::{ConnectionOverrides, load_config, resolve_connection};
use sib_cli::output::{feature_types_table, lookup_table, records_table, schema_table};

use crate::cli::{ConnectionArgs, ExportArgs, ImportArgs};

/// Client for the configured publicWFS.
fn connect(args: &ConnectionArgs) -> Result<WfsClient<HttpService>> {
    let file = load_config(args.config.as_deref())?;
    let config = resolve_connection(
        file,
        ConnectionOverrides {
            url: args.url.clone(),
            username: args.username.clone(),
            password: args.password.clone(),
        },
    )?;
    let service = HttpService::new(config).context("create publicWFS client")?;
    Ok(WfsClient::new(service))
}

pub fn run_feature_types(connection: &ConnectionArgs) -> Result<()> {
    let client = connect(connection)?;
    let types = client
        .list_feature_types()
        .context("list feature types")?;
    println!("{}", feature_types_table(&types));
    Ok(())
}

pub fn run_describe(connection: &ConnectionArgs, feature_type: &str) -> Result<()> {
    let client = connect(connection)?;
    let schema = client
        .describe_feature_type(feature_type)
        .with_context(|| format!("describe {feature_type}"))?;
    println!("{}", schema_table(&schema));
    Ok(())
}

pub fn run_filter(
    connection: &ConnectionArgs,
    expression: &str,
    feature_type: Option<&str>,
) -> Result<()> {
    let filter = match feature_type {
        Some(feature_type) => connect(connection)?
            .compile_filter(feature_type, expression)
            .context("compile filter")?,
        None => sib_filter::compile(expression).context("compile filter")?,
    };
    println!("{filter}");
    Ok(())
}

pub fn run_export(connection: &ConnectionArgs, args: &ExportArgs) -> Result<()> {
    let span = info_span!("export", feature_type = %args.feature_type);
    let _guard = span.enter();

    let options = WfsOptions {
        compact: !args.full,
        attach_lookups: args.attach_lookups,
    };
    let mut source =
        WfsSource::with_feature_type(connect(connection)?, args.feature_type.as_str(), options);
    if let Some(filter) = &args.filter {
        source.set_filter(filter).context("set filter")?;
    }

    match &args.output {
        Some(path) => {
            let summary = CsvTarget::new(path)
                .write(&mut source)
                .with_context(|| format!("export to {}", path.display()))?;
            info!(records = summary.records, "export finished");
            println!("{} records written to {}", summary.records, path.display());
        }
        None => {
            let (columns, records) = head(&mut source, args.limit).context("read features")?;
            println!("{}", records_table(&columns, &records));
        }
    }
    Ok(())
}

fn import_transform(args: &ImportArgs) -> RecordTransform {
    let mut transform = RecordTransform::new();
    for (from, to) in &args.rename {
        transform = transform.rename(from.as_str(), to.as_str());
    }
    for column in &args.remove {
        transform = transform.remove(column.as_str());
    }
    for (column, value) in &args.add {
        transform = transform.add(column.as_str(), Value::text(value.as_str()));
    }
    transform.split_nodes(args.from_node.clone(), args.to_node.clone())
}

/// Returns whether the service confirmed the transaction.
pub fn run_import(connection: &ConnectionArgs, args: &ImportArgs) -> Result<bool> {
    let span = info_span!("import", feature_type = %args.feature_type);
    let _guard = span.enter();

    let input = CsvSource::open(&args.input)
        .with_context(|| format!("open {}", args.input.display()))?;
    let mut records = Transformed::new(input, import_transform(args));

    if args.dry_run {
        let (columns, preview) = head(&mut records, args.limit).context("read input")?;
        println!("{}", records_table(&columns, &preview));
        return Ok(true);
    }

    let mut target = WfsSource::with_feature_type(
        connect(connection)?,
        args.feature_type.as_str(),
        WfsOptions::default(),
    );
    let summary = target.write(&mut records).context("import records")?;
    if summary.success {
        println!("{} records imported into {}", summary.records, args.feature_type);
    } else {
        eprintln!(
            "publicWFS did not confirm the import of {} records",
            summary.records
        );
    }
    Ok(summary.success)
}

pub fn run_lookup(connection: &ConnectionArgs, lookup_type: &str, code: &str) -> Result<()> {
    let client = connect(connection)?;
    let record = client
        .resolve_by_code(lookup_type, code)
        .with_context(|| format!("look up {code} in {lookup_type}"))?;
    println!("{}", lookup_table(&record));
    Ok(())
}

pub fn run_raw(connection: &ConnectionArgs, request: &Path, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("raw requests are sent unchecked and may change or delete data; pass --yes to send");
    }
    let body = std::fs::read_to_string(request)
        .with_context(|| format!("read {}", request.display()))?;
    let response = connect(connection)?
        .raw_request(&body)
        .context("send raw request")?;
    println!("{response}");
    Ok(())
}
