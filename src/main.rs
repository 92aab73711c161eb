mod logging;

use clap::{Parser, Subcommand};
use qr_nbu::batch::{decode_csv, encode_csv, BatchSummary};
use qr_nbu::util::format_amount;
use qr_nbu::{PaymentDataToEncode, PaymentDetails, QrCodeManager};
use rust_decimal::Decimal;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qr-nbu")]
#[command(about = "NBU payment QR payload encoder and decoder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Encode(EncodeArgs),
    Decode(DecodeArgs),
    #[cfg(feature = "qrcode")]
    Generate(GenerateArgs),
    BatchEncode(BatchArgs),
    BatchDecode(BatchArgs),
}

#[derive(Parser)]
struct PaymentArgs {
    #[arg(long)]
    beneficiary: String,
    #[arg(long)]
    account: String,
    #[arg(long)]
    amount: Option<Decimal>,
    #[arg(long)]
    code: String,
    #[arg(long)]
    purpose: String,
}

impl PaymentArgs {
    fn to_payment(&self) -> PaymentDataToEncode {
        PaymentDataToEncode {
            beneficiary: self.beneficiary.clone(),
            beneficiary_account: self.account.clone(),
            amount: self.amount,
            beneficiary_code: self.code.clone(),
            payment_purpose: self.purpose.clone(),
        }
    }
}

#[derive(Parser)]
struct EncodeArgs {
    #[command(flatten)]
    payment: PaymentArgs,
    /// Write the payload to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct DecodeArgs {
    /// Payload file; stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[cfg(feature = "qrcode")]
#[derive(Parser)]
struct GenerateArgs {
    #[command(flatten)]
    payment: PaymentArgs,
    #[arg(long, default_value_t = qr_nbu::reference::DEFAULT_QR_SIZE)]
    width: u32,
    #[arg(long, default_value_t = qr_nbu::reference::DEFAULT_QR_SIZE)]
    height: u32,
    #[arg(long, default_value = "payment-qr.png")]
    output: PathBuf,
}

#[derive(Parser)]
struct BatchArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("qr-nbu")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Encode(args) => run_encode(args),
        Command::Decode(args) => run_decode(args),
        #[cfg(feature = "qrcode")]
        Command::Generate(args) => run_generate(args),
        Command::BatchEncode(args) => run_batch("encode", &args, encode_csv),
        Command::BatchDecode(args) => run_batch("decode", &args, decode_csv),
    }
}

fn run_encode(args: EncodeArgs) -> Result<(), String> {
    let manager = QrCodeManager::builder().build();
    let payload = manager
        .encode_qr_data(&args.payment.to_payment())
        .map_err(|err| err.to_string())?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &payload).map_err(|err| err.to_string())?;
            emit_info_line(&format!(
                "Wrote {} byte payload to {}",
                payload.len(),
                path.display()
            ));
        }
        None => print!("{payload}"),
    }
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<(), String> {
    let data = match args.input {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|err| format!("cannot read {}: {err}", path.display()))?,
        None => {
            let mut data = String::new();
            std::io::stdin()
                .read_to_string(&mut data)
                .map_err(|err| err.to_string())?;
            data
        }
    };

    let manager = QrCodeManager::builder().build();
    let details = manager.decode_qr_data(&data).map_err(|err| err.to_string())?;
    print_details(&details);
    Ok(())
}

fn print_details(details: &PaymentDetails) {
    println!("beneficiary: {}", details.beneficiary);
    println!("beneficiary_account: {}", details.beneficiary_account);
    println!("currency: {}", details.currency);
    println!("amount: {}", format_amount(details.amount.as_ref()));
    println!("beneficiary_code: {}", details.beneficiary_code);
    println!("payment_purpose: {}", details.payment_purpose);
}

#[cfg(feature = "qrcode")]
fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let manager = QrCodeManager::builder()
        .renderer(qr_nbu::PngRenderer::default())
        .build();
    let image = manager
        .generate_qr(&args.payment.to_payment(), args.width, args.height)
        .map_err(|err| err.to_string())?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    std::fs::write(&args.output, &image.png).map_err(|err| err.to_string())?;
    emit_info_line(&format!(
        "QR image {}x{}: {}",
        image.width,
        image.height,
        args.output.display()
    ));
    Ok(())
}

fn run_batch<F>(label: &str, args: &BatchArgs, batch: F) -> Result<(), String>
where
    F: FnOnce(&Path, &Path) -> Result<BatchSummary, qr_nbu::BatchError>,
{
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }

    let start = Instant::now();
    let summary = batch(&args.input, &args.output).map_err(|err| err.to_string())?;
    emit_info_line(&format!(
        "Batch {label}: records={} succeeded={} failed={} in {} ms",
        summary.total_records,
        summary.succeeded,
        summary.failed(),
        start.elapsed().as_millis()
    ));
    emit_failure_summary(label, &summary);
    emit_info_line(&format!("Batch output: {}", args.output.display()));
    Ok(())
}

fn emit_failure_summary(label: &str, summary: &BatchSummary) {
    let items = summary.failure_counts();
    let max_items = 5usize;
    for (err, count) in items.iter().take(max_items) {
        emit_info_line(&format!("Batch {label} errors: {err} = {count}"));
    }
    if items.len() > max_items {
        emit_info_line(&format!(
            "Batch {label} errors: {} additional error kinds not shown",
            items.len() - max_items
        ));
    }
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        eprintln!("{message}");
    }
}
