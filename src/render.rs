/*!
render.rs - VRAM-to-pixels collaborators.

Out of scope for the core (spec §1): the renderer only ever reads memory
between `step` calls, never writes (spec §5). The cabinet's video RAM is
256 columns of 28 bytes each (224 rows packed 8-to-a-byte), starting at
0x2400 — exactly the 0x1C00-byte span spec §6 calls out — scanned
column-major and physically rotated 90 degrees on the real monitor. This
module undoes that rotation once, in `pixel_at`, and every renderer below
builds on it.

Only the terminal renderer is compiled by default (spec §1's "terminal
renderer" collaborator). `display` and `screenshot` are opt-in Cargo
features mirroring the teacher crate's split.
*/

use std::io::{self, Write};

use crate::memory::Memory;

pub const VRAM_BASE: u16 = 0x2400;
pub const NATIVE_COLUMNS: u32 = 256;
pub const NATIVE_ROWS: u32 = 224;
pub const BYTES_PER_COLUMN: u32 = NATIVE_ROWS / 8;

/// Upright screen dimensions after undoing the cabinet's 90-degree
/// rotation (native columns become screen rows and vice versa).
pub const SCREEN_WIDTH: u32 = NATIVE_ROWS;
pub const SCREEN_HEIGHT: u32 = NATIVE_COLUMNS;

#[inline]
fn native_pixel(mem: &Memory, col: u32, row: u32) -> bool {
    let addr = VRAM_BASE + (col * BYTES_PER_COLUMN + row / 8) as u16;
    (mem.read(addr) >> (row % 8)) & 1 != 0
}

/// Read the upright pixel at `(x, y)`, `x` in `0..SCREEN_WIDTH`, `y` in
/// `0..SCREEN_HEIGHT`.
#[inline]
pub fn pixel_at(mem: &Memory, x: u32, y: u32) -> bool {
    let col = y;
    let row = SCREEN_WIDTH - 1 - x;
    native_pixel(mem, col, row)
}

/// Render the framebuffer as block glyphs to `out`, packing two vertical
/// pixels per character via the half-block trick so the dump fits in a
/// normal terminal height.
pub fn draw_terminal(mem: &Memory, out: &mut impl Write) -> io::Result<()> {
    for y in (0..SCREEN_HEIGHT).step_by(2) {
        for x in 0..SCREEN_WIDTH {
            let top = pixel_at(mem, x, y);
            let bottom = pixel_at(mem, x, y + 1);
            let glyph = match (top, bottom) {
                (true, true) => '\u{2588}',  // full block
                (true, false) => '\u{2580}', // upper half block
                (false, true) => '\u{2584}', // lower half block
                (false, false) => ' ',
            };
            write!(out, "{glyph}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// RGBA8 framebuffer, white-on-black, suitable for `pixels`/`image`.
pub fn rgba_frame(mem: &Memory) -> Vec<u8> {
    let mut buf = vec![0u8; (SCREEN_WIDTH * SCREEN_HEIGHT * 4) as usize];
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            let idx = ((y * SCREEN_WIDTH + x) * 4) as usize;
            let on = pixel_at(mem, x, y);
            let v = if on { 0xFF } else { 0x00 };
            buf[idx] = v;
            buf[idx + 1] = v;
            buf[idx + 2] = v;
            buf[idx + 3] = 0xFF;
        }
    }
    buf
}

#[cfg(feature = "screenshot")]
pub fn save_screenshot(mem: &Memory, path: impl AsRef<std::path::Path>) -> Result<(), String> {
    let frame = rgba_frame(mem);
    image::save_buffer(
        path.as_ref(),
        &frame,
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        image::ColorType::Rgba8,
    )
    .map_err(|e| format!("failed to write screenshot: {e}"))
}

#[cfg(feature = "display")]
pub mod window {
    //! Live `winit` + `pixels` window. The caller drives the emulator and
    //! calls `DisplayWindow::present` once per rendered frame; this module
    //! owns nothing about CPU timing.

    use std::num::NonZeroU32;
    use std::sync::Arc;

    use pixels::{Pixels, SurfaceTexture};
    use winit::application::ApplicationHandler;
    use winit::event::WindowEvent;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::window::{Window, WindowId};

    use super::{rgba_frame, SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::memory::Memory;

    /// Runs a winit event loop that repaints from `snapshot` whenever the
    /// window requests a redraw, until the window is closed or `should_quit`
    /// returns true. `snapshot` is called on every redraw, so it should be
    /// cheap (a clone of the VRAM region, or a reference into a
    /// `Mutex`-guarded memory if running alongside emulation on another
    /// thread).
    pub fn run(
        title: &str,
        mut snapshot: impl FnMut() -> Memory + 'static,
        mut should_quit: impl FnMut() -> bool + 'static,
    ) -> Result<(), String> {
        let event_loop = EventLoop::new().map_err(|e| e.to_string())?;
        event_loop.set_control_flow(ControlFlow::Poll);
        let mut app = App {
            title: title.to_string(),
            window: None,
            pixels: None,
            snapshot: Box::new(move || snapshot()),
            should_quit: Box::new(move || should_quit()),
        };
        event_loop.run_app(&mut app).map_err(|e| e.to_string())
    }

    struct App {
        title: String,
        window: Option<Arc<Window>>,
        pixels: Option<Pixels<'static>>,
        snapshot: Box<dyn FnMut() -> Memory>,
        should_quit: Box<dyn FnMut() -> bool>,
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            let attrs = Window::default_attributes()
                .with_title(self.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    SCREEN_WIDTH * 2,
                    SCREEN_HEIGHT * 2,
                ));
            let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

            let size = window.inner_size();
            let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
            let pixels = Pixels::new(SCREEN_WIDTH, SCREEN_HEIGHT, surface_texture)
                .expect("initialize pixels surface");

            self.window = Some(window);
            self.pixels = Some(pixels);
        }

        fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
            match event {
                WindowEvent::CloseRequested => event_loop.exit(),
                WindowEvent::Resized(size) => {
                    if let (Some(pixels), Some(w), Some(h)) = (
                        self.pixels.as_mut(),
                        NonZeroU32::new(size.width),
                        NonZeroU32::new(size.height),
                    ) {
                        let _ = pixels.resize_surface(w.get(), h.get());
                    }
                }
                WindowEvent::RedrawRequested => {
                    if (self.should_quit)() {
                        event_loop.exit();
                        return;
                    }
                    if let Some(pixels) = self.pixels.as_mut() {
                        let mem = (self.snapshot)();
                        pixels.frame_mut().copy_from_slice(&rgba_frame(&mem));
                        if pixels.render().is_err() {
                            event_loop.exit();
                        }
                    }
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_at_reads_the_expected_bit() {
        let mut mem = Memory::new();
        // Native column 0, row 0 -> byte at 0x2400, bit 0.
        mem.write(VRAM_BASE, 0b0000_0001);
        // Upright (x, y) = (SCREEN_WIDTH-1, 0) maps back to (col=0, row=0).
        assert!(pixel_at(&mem, SCREEN_WIDTH - 1, 0));
        assert!(!pixel_at(&mem, 0, 0));
    }

    #[test]
    fn rgba_frame_is_white_on_black() {
        let mut mem = Memory::new();
        mem.write(VRAM_BASE, 0xFF);
        let frame = rgba_frame(&mem);
        assert_eq!(frame.len(), (SCREEN_WIDTH * SCREEN_HEIGHT * 4) as usize);
        // Some pixel in the frame must be lit given a fully-set byte.
        assert!(frame.chunks(4).any(|px| px == [0xFF, 0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn draw_terminal_produces_one_line_per_two_rows() {
        let mem = Memory::new();
        let mut out = Vec::new();
        draw_terminal(&mem, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count() as u32, SCREEN_HEIGHT / 2);
    }
}
