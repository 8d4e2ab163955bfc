//! CARDIAC Emulator - CLI Entry Point
//!
//! Commands:
//! - `cardiac-emu` - interactive front panel
//! - `cardiac-emu run` - headless execution until halt
//!
//! The `--image` flag selects the memory image file used by the panel's
//! dump/restore keys and by `run --image`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardiac-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the CARDIAC (1968) cardboard teaching computer")]
struct Cli {
    /// Memory image file for dump/restore
    #[arg(long, default_value = "memdump.cardiac")]
    image: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run headless until the machine halts
    Run {
        /// Restore this memory image before starting
        #[arg(long)]
        image: Option<PathBuf>,
        /// Maximum number of cycles to run (default: 10000)
        #[arg(short, long, default_value = "10000")]
        max_cycles: u64,
        /// Show trace output
        #[arg(short, long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            image,
            max_cycles,
            trace,
        }) => {
            run_headless(image, max_cycles, trace);
        }
        None => {
            if let Err(e) = cardiac::run_console(cli.image) {
                eprintln!("Front panel error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_headless(image: Option<PathBuf>, max_cycles: u64, trace: bool) {
    use cardiac::cpu::disassemble;
    use cardiac::{load_image, Cpu};

    let mut cpu = Cpu::new();

    if let Some(path) = image {
        match load_image(&path) {
            Ok(img) => {
                img.apply(&mut cpu);
                println!("Loaded {} words from {}", img.len(), path.display());
            }
            Err(e) => {
                eprintln!("Failed to load image: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!();
    println!("━━━ Execution ━━━");

    let mut cycles = 0u64;
    while cpu.is_running() && cycles < max_cycles {
        let pc = cpu.ip;
        let word = cpu.mem.read(pc as usize);

        cpu.execute_current();
        cycles += 1;

        if trace {
            println!(
                "{:02}: {:<12} ACC={:+05} IP={:02}",
                pc,
                disassemble(word),
                cpu.accumulator,
                cpu.ip
            );
        }
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", cycles);
    println!("State: {:?}", cpu.state);
    println!("Accumulator: {}", cpu.accumulator);
    match cpu.output {
        Some(v) => println!("Output: {}", v),
        None => println!("Output: (blank)"),
    }

    if cycles >= max_cycles {
        println!();
        println!("Reached max cycles limit ({}). Use --max-cycles to increase.", max_cycles);
    }
}
