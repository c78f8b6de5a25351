use std::path::PathBuf;

use clap::Parser;
use clap_num::maybe_hex;
use log::{error, info};

use avrdis::chip::ChipConfig;
use avrdis::emit::{dump_raw_hex, write_listing};
use avrdis::error::RunError;
use avrdis::hex;
use avrdis::image::Image;
use avrdis::traversal::Decoder;

/// Static recursive-descent disassembler for ATmega8-class AVR firmware
///
/// Loads an Intel HEX program image, traverses it from the reset/IRQ
/// vector table, and writes a reassemblable AVR-assembler listing. If any
/// word in the reachable control flow can't be decoded, no partial listing
/// is written; a raw hex dump of the image is emitted instead.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// Path to the input Intel HEX file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the output listing file
    #[arg(short, long)]
    output: PathBuf,

    /// Override the chip's flash size in words (use 0x prefix for
    /// hexadecimal); must be a power of two
    #[arg(long, value_parser=maybe_hex::<usize>)]
    flash_size: Option<usize>,

    /// Override the number of reset/interrupt vectors seeded as initial
    /// chain origins
    #[arg(long, value_parser=maybe_hex::<u16>)]
    irq_table_size: Option<u16>,
}

fn run(args: &Args) -> Result<(), RunError> {
    let mut chip = ChipConfig::atmega8();
    if let Some(flash_size) = args.flash_size {
        chip.flash_size = flash_size;
    }
    if let Some(irq_table_size) = args.irq_table_size {
        chip.irq_table_size = irq_table_size;
    }
    let mut image = Image::new(chip.flash_size);
    hex::load_into(&args.input, &mut image)?;
    info!("{} opened", args.input.display());

    let mut out = std::fs::File::create(&args.output).map_err(|source| RunError::Emit {
        path: args.output.display().to_string(),
        source,
    })?;

    let decoder = Decoder::new(&image, &chip);
    match decoder.run() {
        Ok(lines) => {
            write_listing(&mut out, &image, &lines).map_err(|source| RunError::Emit {
                path: args.output.display().to_string(),
                source,
            })?;
        }
        Err(decode_err) => {
            error!("decode failed, falling back to raw hex dump: {decode_err}");
            dump_raw_hex(&mut out, &image).map_err(|source| RunError::Emit {
                path: args.output.display().to_string(),
                source,
            })?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
