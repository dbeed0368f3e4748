use anyhow::{Context, Result};
use clap::Parser;
use dnswire::dns::resolver::transporter::{TransportOptions, send_query_with};
use dnswire::dns::resolver::{QueryBuilder, Record, RecordData, RecordType, Response};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Ask a DNS server one question over UDP and print what comes back.
#[derive(Parser, Debug)]
#[command(name = "dnswire", version, about)]
struct Cli {
    /// Domain name to query
    domain: String,

    /// Record type, e.g. A, MX, TXT or * for ALL
    #[arg(short = 't', long = "type", default_value = "A")]
    record_type: RecordType,

    /// Server as IP, IP:PORT or host name
    #[arg(short, long, default_value = "1.1.1.1")]
    server: String,

    /// Clear the RD flag
    #[arg(long)]
    no_recursion: bool,

    /// Read timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Print the decoded response as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut builder = QueryBuilder::new().add_question(&cli.domain, cli.record_type);
    if !cli.no_recursion {
        builder = builder.recursion_desired();
    }
    let query = builder.build();
    debug!(id = %query.id_hex(), domain = %cli.domain, record_type = %cli.record_type, "query built");

    let options = TransportOptions::new().read_timeout(Duration::from_secs(cli.timeout));
    let response = send_query_with(&cli.server, &query, &options)
        .with_context(|| format!("querying {} for {} {}", cli.server, cli.domain, cli.record_type))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_response(response: &Response) {
    println!(
        ";; id {:#06x}, rcode {:?}, aa {}, tc {}, ra {}",
        response.id(),
        response.response_code(),
        response.is_authoritative(),
        response.is_truncated(),
        response.is_recursion_available()
    );

    println!(";; QUESTION");
    for question in response.questions() {
        println!("{}\tIN\t{}", question.name, question.record_type);
    }

    for (title, records) in [
        ("ANSWER", response.answers()),
        ("AUTHORITY", response.authority()),
        ("ADDITIONAL", response.additional()),
    ] {
        if records.is_empty() {
            continue;
        }
        println!(";; {title}");
        for record in records {
            println!("{}", format_record(record));
        }
    }
}

fn format_record(record: &Record) -> String {
    let data = match &record.data {
        RecordData::A(ip) => ip.to_string(),
        RecordData::Ns(name)
        | RecordData::Md(name)
        | RecordData::Mf(name)
        | RecordData::Cname(name)
        | RecordData::Mb(name)
        | RecordData::Mg(name)
        | RecordData::Mr(name)
        | RecordData::Null(name)
        | RecordData::Ptr(name) => name.clone(),
        RecordData::Soa(soa) => format!(
            "{} {} {} {} {} {} {}",
            soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
        ),
        RecordData::Wks {
            address,
            protocol,
            bitmap,
        } => format!("{address} {protocol} ({} bitmap bytes)", bitmap.len()),
        RecordData::Hinfo(text) | RecordData::Txt(text) => format!("{text:?}"),
        RecordData::Minfo {
            responsible_mailbox,
            error_mailbox,
        } => format!("{responsible_mailbox} {error_mailbox}"),
        RecordData::Mx {
            preference,
            exchange,
        } => format!("{preference} {exchange}"),
    };

    format!(
        "{}\t{}\t{}\t{}\t{}",
        record.name, record.ttl, record.class, record.record_type, data
    )
}
