//! CLI driver: loads the Space Invaders ROM set, runs the step loop with
//! periodic RST 1 / RST 2 interrupt injection, and renders to the
//! terminal (or, with `--features display`, a live window). Also exposes
//! a `disassemble` mode that walks a flat binary with no emulation at
//! all, reusing the same `disasm` function the run loop's fatal
//! diagnostic uses (spec §11's original_source/-derived feature).

use std::env;
use std::fs;
use std::process::ExitCode;

use invaders8080::cpu::disasm;
use invaders8080::cpu::StepOutcome;
use invaders8080::invaders::InvadersIo;
use invaders8080::memory::Memory;
use invaders8080::rom::load_rom_files;
use invaders8080::{render, Cpu};

/// Roughly how many instructions fit in one 60Hz video frame on the real
/// board; used only to decide when to inject the mid-frame and
/// end-of-frame RST interrupts, not to model cycle-accurate timing
/// (spec §1 non-goal).
const INSTRUCTIONS_PER_HALF_FRAME: u64 = 16_667;

struct RunOptions {
    rom_dir: String,
    verbose: bool,
    stop_after: Option<u64>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("disassemble") => run_disassemble(&args[1..]),
        Some("run") => match parse_run_options(&args[1..]) {
            Ok(opts) => run_emulator(opts),
            Err(message) => {
                eprintln!("{message}");
                print_usage();
                ExitCode::FAILURE
            }
        },
        None => match parse_run_options(&args) {
            Ok(opts) => run_emulator(opts),
            Err(message) => {
                eprintln!("{message}");
                print_usage();
                ExitCode::FAILURE
            }
        },
        Some(other) => {
            eprintln!("unknown subcommand '{other}'");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!("  invaders8080 run <rom_dir> [--verbose] [--stop-after N]");
    eprintln!("  invaders8080 disassemble <path>");
}

fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut rom_dir = None;
    let mut verbose = false;
    let mut stop_after = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" => verbose = true,
            "--stop-after" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--stop-after requires a value".to_string())?;
                stop_after = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("invalid --stop-after value '{value}'"))?,
                );
            }
            other if rom_dir.is_none() => rom_dir = Some(other.to_string()),
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }
    Ok(RunOptions {
        rom_dir: rom_dir.ok_or("missing <rom_dir>".to_string())?,
        verbose,
        stop_after,
    })
}

fn run_emulator(opts: RunOptions) -> ExitCode {
    let mut mem = Memory::new();
    let paths = [
        format!("{}/invaders.h", opts.rom_dir),
        format!("{}/invaders.g", opts.rom_dir),
        format!("{}/invaders.f", opts.rom_dir),
        format!("{}/invaders.e", opts.rom_dir),
    ];
    if let Err(err) = load_rom_files(&paths, &mut mem) {
        eprintln!("fatal: {err}");
        return ExitCode::FAILURE;
    }

    let mut cpu = Cpu::new();
    cpu.regs.ie = true;
    let mut io = InvadersIo::new();
    let mut instructions = 0u64;
    let mut next_interrupt_at = INSTRUCTIONS_PER_HALF_FRAME;
    let mut next_vector = 1u8;
    let mut frame = 0u64;

    loop {
        if let Some(limit) = opts.stop_after {
            if instructions >= limit {
                break;
            }
        }

        match cpu.step(&mut mem, &mut io) {
            StepOutcome::Advanced => {}
            StepOutcome::Halted => {
                // Only an interrupt can resume from here; keep stepping so
                // the scheduled RST below still lands.
            }
            StepOutcome::UnimplementedOpcode { opcode, pc } => {
                eprint!("fatal: {}", disasm::unimplemented_opcode_line(opcode, pc));
                return ExitCode::FAILURE;
            }
        }
        instructions += 1;

        if instructions >= next_interrupt_at {
            cpu.raise_interrupt(&mut mem, next_vector);
            next_vector = if next_vector == 1 { 2 } else { 1 };
            next_interrupt_at += INSTRUCTIONS_PER_HALF_FRAME;
            if next_vector == 1 {
                frame += 1;
                if opts.verbose {
                    println!(
                        "frame {frame}: pc={:#06x} a={:#04x} sp={:#06x}",
                        cpu.regs.pc, cpu.regs.a, cpu.regs.sp
                    );
                }
                render::draw_terminal(&mem, &mut std::io::stdout()).ok();
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_disassemble(args: &[String]) -> ExitCode {
    let Some(path) = args.first() else {
        eprintln!("disassemble requires a path");
        print_usage();
        return ExitCode::FAILURE;
    };
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("fatal: failed to read '{path}': {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut mem = Memory::new();
    invaders8080::rom::load_rom_image(&bytes, &mut mem);

    let mut pc: u32 = 0;
    let end = bytes.len() as u32;
    while pc < end {
        let (text, width) = disasm::disasm(&mem, pc as u16);
        print!("{text}");
        pc += width.max(1) as u32;
    }
    ExitCode::SUCCESS
}
