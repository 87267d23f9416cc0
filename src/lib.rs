/*!
invaders8080 - An Intel 8080 emulator sufficient to run the Space
Invaders arcade ROM set.

`cpu` is the core (spec §1): register/flag state, the pure ALU
primitives, opcode dispatch, the disassembler, and interrupt injection.
`memory` and `io` are the narrow interfaces the core talks through.
`rom`, `invaders`, and `render` are the external collaborators spec.md
treats as freely reimplementable: a fixed-offset ROM loader, the Space
Invaders port map, and VRAM-to-pixels rendering.
*/

pub mod cpu;
pub mod invaders;
pub mod io;
pub mod memory;
pub mod render;
pub mod rom;

pub use cpu::{Cpu, Flags, Registers, StepOutcome};
pub use io::PortIo;
pub use memory::Memory;
