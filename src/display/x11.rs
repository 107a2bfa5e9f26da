//! X11 backend over `x11rb`.
//!
//! Pixels move with core `GetImage`/`PutImage` in 32-bit Z-pixmap format,
//! split into horizontal strips that stay under the server's request limit.
//! Only 24/32-bit TrueColor root visuals with `0xRRGGBB` masks are accepted,
//! which lets canvas pixels go on the wire unchanged apart from byte order.

use std::collections::VecDeque;
use std::os::fd::AsRawFd;
use std::time::Duration;

use rootclock_render::{Canvas, MAX_DIMENSION, Rect, RenderError, Surface};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::Event;
use x11rb::protocol::xinerama::{self, ConnectionExt as _};
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ChangeWindowAttributesAux, ConfigureWindowAux, ConnectionExt as _,
    CreateGCAux, CreateWindowAux, EventMask, Gcontext, ImageFormat, ImageOrder, PropMode,
    StackMode, VisualClass, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::{COPY_DEPTH_FROM_PARENT, COPY_FROM_PARENT, NONE};

use super::{DisplayBackend, DisplayError, DisplayEvent, DrawTarget, WaitOutcome, WindowId};
use crate::monitor::MonitorSource;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _XROOTPMAP_ID,
        ESETROOT_PMAP_ID,
        _NET_WM_WINDOW_TYPE,
        _NET_WM_WINDOW_TYPE_DESKTOP,
        _NET_WM_STATE,
        _NET_WM_STATE_BELOW,
    }
}

const BYTES_PER_PIXEL: usize = 4;
/// Room for the PutImage request header.
const REQUEST_HEADER_BYTES: usize = 64;

pub struct X11Display {
    conn: RustConnection,
    root: Window,
    depth: u8,
    black_pixel: u32,
    byte_order: ImageOrder,
    width: u32,
    height: u32,
    atoms: Atoms,
    cm_selection: Atom,
    gc: Gcontext,
    target: Window,
    max_request_bytes: usize,
    xinerama: bool,
    pending: VecDeque<Event>,
}

impl X11Display {
    /// Connect to `$DISPLAY` and prepare the root window.
    ///
    /// # Errors
    /// Connection failures, display sizes outside 1..=32767 and unsupported
    /// root visuals are all fatal.
    pub fn connect() -> Result<Self, DisplayError> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let setup = conn.setup();
        let screen = setup
            .roots
            .get(screen_num)
            .ok_or_else(|| DisplayError::Query(format!("screen {} does not exist", screen_num)))?;

        let (width, height) = (
            u32::from(screen.width_in_pixels),
            u32::from(screen.height_in_pixels),
        );
        check_size(width, height)?;

        let root = screen.root;
        let depth = screen.root_depth;
        let black_pixel = screen.black_pixel;
        check_visual(&conn, screen_num)?;
        let byte_order = setup.image_byte_order;

        let atoms = Atoms::new(&conn)?.reply()?;
        let cm_name = format!("_NET_WM_CM_S{}", screen_num);
        let cm_selection = conn.intern_atom(false, cm_name.as_bytes())?.reply()?.atom;

        let gc = conn.generate_id()?;
        conn.create_gc(gc, root, &CreateGCAux::new())?;
        conn.change_window_attributes(
            root,
            &ChangeWindowAttributesAux::new()
                .event_mask(EventMask::EXPOSURE | EventMask::STRUCTURE_NOTIFY),
        )?;

        let xinerama = conn
            .extension_information(xinerama::X11_EXTENSION_NAME)?
            .is_some();
        let max_request_bytes = conn.maximum_request_bytes();
        conn.flush()?;

        log::info!(
            "Connected to X11 screen {}: {}x{} depth {} (xinerama: {})",
            screen_num,
            width,
            height,
            depth,
            xinerama
        );

        Ok(Self {
            conn,
            root,
            depth,
            black_pixel,
            byte_order,
            width,
            height,
            atoms,
            cm_selection,
            gc,
            target: root,
            max_request_bytes,
            xinerama,
            pending: VecDeque::new(),
        })
    }

    /// The declared wallpaper pixmap, if any.
    fn wallpaper_pixmap(&self) -> Option<u32> {
        for atom in [self.atoms._XROOTPMAP_ID, self.atoms.ESETROOT_PMAP_ID] {
            let reply = self
                .conn
                .get_property(false, self.root, atom, AtomEnum::PIXMAP, 0, 1)
                .ok()
                .and_then(|cookie| cookie.reply().ok());
            let Some(reply) = reply else {
                continue;
            };
            if reply.type_ != u32::from(AtomEnum::PIXMAP)
                || reply.format != 32
                || reply.value_len != 1
            {
                continue;
            }
            if let Some(pixmap) = reply.value32().and_then(|mut v| v.next())
                && pixmap != NONE
            {
                return Some(pixmap);
            }
        }
        None
    }

    /// Read `rect` of `drawable` into the canvas, strip by strip.
    fn read_into(&self, drawable: u32, canvas: &mut Canvas, rect: Rect) -> Result<(), DisplayError> {
        for strip in strips(rect, self.max_request_bytes) {
            let reply = self
                .conn
                .get_image(
                    ImageFormat::Z_PIXMAP,
                    drawable,
                    strip.x as i16,
                    strip.y as i16,
                    strip.width as u16,
                    strip.height as u16,
                    !0,
                )?
                .reply()?;
            if reply.data.len() < strip.area() * BYTES_PER_PIXEL {
                return Err(DisplayError::Query(format!(
                    "short image: {} bytes for {}x{}",
                    reply.data.len(),
                    strip.width,
                    strip.height
                )));
            }
            canvas.write_rect(strip, &decode_pixels(&reply.data, self.byte_order));
        }
        Ok(())
    }

    fn write_from(&self, canvas: &Canvas, rect: Rect) -> Result<(), DisplayError> {
        for strip in strips(rect, self.max_request_bytes) {
            let Some((clip, pixels)) = canvas.read_rect(strip) else {
                continue;
            };
            self.conn.put_image(
                ImageFormat::Z_PIXMAP,
                self.target,
                self.gc,
                clip.width as u16,
                clip.height as u16,
                clip.x as i16,
                clip.y as i16,
                0,
                self.depth,
                &encode_pixels(&pixels, self.byte_order),
            )?;
        }
        Ok(())
    }
}

impl Drop for X11Display {
    fn drop(&mut self) {
        let _ = self.conn.free_gc(self.gc);
        let _ = self.conn.flush();
    }
}

impl Surface for X11Display {
    fn fetch_background(&mut self, canvas: &mut Canvas, rect: Rect) -> Result<(), RenderError> {
        if let Some(pixmap) = self.wallpaper_pixmap() {
            match self.read_into(pixmap, canvas, rect) {
                Ok(()) => return Ok(()),
                Err(e) => log::debug!("Wallpaper pixmap 0x{:x} unreadable: {}", pixmap, e),
            }
        }
        self.read_into(self.root, canvas, rect)
            .map_err(|e| RenderError::Fetch(e.to_string()))
    }

    fn present(&mut self, canvas: &Canvas, rect: Rect) -> Result<(), RenderError> {
        self.write_from(canvas, rect)
            .map_err(|e| RenderError::Present(e.to_string()))
    }
}

impl MonitorSource for X11Display {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn monitors(&mut self) -> Result<Option<Vec<Rect>>, DisplayError> {
        if !self.xinerama || self.conn.xinerama_is_active()?.reply()?.state == 0 {
            return Ok(None);
        }
        let screens = self.conn.xinerama_query_screens()?.reply()?.screen_info;
        Ok(Some(
            screens
                .iter()
                .map(|s| {
                    Rect::new(
                        i32::from(s.x_org),
                        i32::from(s.y_org),
                        i32::from(s.width),
                        i32::from(s.height),
                    )
                })
                .collect(),
        ))
    }
}

impl DisplayBackend for X11Display {
    fn root(&self) -> WindowId {
        self.root
    }

    fn poll_event(&mut self) -> Result<Option<DisplayEvent>, DisplayError> {
        let event = match self.pending.pop_front() {
            Some(event) => event,
            None => match self.conn.poll_for_event()? {
                Some(event) => event,
                None => return Ok(None),
            },
        };

        Ok(Some(match event {
            Event::Expose(e) => DisplayEvent::Expose { window: e.window },
            Event::ConfigureNotify(e) if e.window == self.root => {
                self.width = u32::from(e.width);
                self.height = u32::from(e.height);
                DisplayEvent::Configure {
                    width: self.width,
                    height: self.height,
                }
            }
            Event::Error(e) => {
                log::debug!("X11 error: {:?}", e);
                DisplayEvent::Other
            }
            _ => DisplayEvent::Other,
        }))
    }

    fn compositor_active(&mut self) -> bool {
        match self
            .conn
            .get_selection_owner(self.cm_selection)
            .map_err(DisplayError::from)
            .and_then(|cookie| cookie.reply().map_err(DisplayError::from))
        {
            Ok(reply) => reply.owner != NONE,
            Err(e) => {
                log::debug!("Compositor selection query failed: {}", e);
                false
            }
        }
    }

    fn create_desktop_window(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<WindowId, DisplayError> {
        check_size(width, height)?;
        let window = self.conn.generate_id()?;
        let aux = CreateWindowAux::new()
            .background_pixel(self.black_pixel)
            .override_redirect(1)
            .event_mask(EventMask::EXPOSURE);
        self.conn
            .create_window(
                COPY_DEPTH_FROM_PARENT,
                window,
                self.root,
                0,
                0,
                width as u16,
                height as u16,
                0,
                WindowClass::INPUT_OUTPUT,
                COPY_FROM_PARENT,
                &aux,
            )?
            .check()?;

        self.conn.change_property32(
            PropMode::REPLACE,
            window,
            self.atoms._NET_WM_WINDOW_TYPE,
            AtomEnum::ATOM,
            &[self.atoms._NET_WM_WINDOW_TYPE_DESKTOP],
        )?;
        self.conn.change_property32(
            PropMode::REPLACE,
            window,
            self.atoms._NET_WM_STATE,
            AtomEnum::ATOM,
            &[self.atoms._NET_WM_STATE_BELOW],
        )?;
        self.conn.map_window(window)?;
        self.conn.configure_window(
            window,
            &ConfigureWindowAux::new().stack_mode(StackMode::BELOW),
        )?;
        self.conn.flush()?;
        Ok(window)
    }

    fn destroy_window(&mut self, window: WindowId) {
        if self.target == window {
            self.target = self.root;
        }
        if let Err(e) = self.conn.destroy_window(window).map(|_| ()) {
            log::warn!("Failed to destroy window 0x{:x}: {}", window, e);
        }
        let _ = self.conn.flush();
    }

    fn resize_and_lower(
        &mut self,
        window: WindowId,
        width: u32,
        height: u32,
    ) -> Result<(), DisplayError> {
        self.conn.configure_window(
            window,
            &ConfigureWindowAux::new()
                .width(width)
                .height(height)
                .stack_mode(StackMode::BELOW),
        )?;
        self.conn.flush()?;
        Ok(())
    }

    fn set_target(&mut self, target: DrawTarget) {
        self.target = match target {
            DrawTarget::Root => self.root,
            DrawTarget::Desktop(window) => window,
        };
    }

    fn wait(&mut self, timeout: Duration) -> Result<WaitOutcome, DisplayError> {
        // Replies read since the last drain may have queued events already
        if let Some(event) = self.conn.poll_for_event()? {
            self.pending.push_back(event);
            return Ok(WaitOutcome::Ready);
        }
        self.conn.flush()?;

        let mut pfd = libc::pollfd {
            fd: self.conn.stream().as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = timeout.as_micros().div_ceil(1000).min(i32::MAX as u128) as i32;
        // SAFETY: `pfd` is a valid pollfd for the duration of the call.
        let r = unsafe { libc::poll(&mut pfd, 1, millis) };
        match r {
            0 => Ok(WaitOutcome::TimedOut),
            r if r > 0 => Ok(WaitOutcome::Ready),
            _ => {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    Ok(WaitOutcome::Interrupted)
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.conn.flush()?;
        Ok(())
    }
}

fn check_size(width: u32, height: u32) -> Result<(), DisplayError> {
    let max = MAX_DIMENSION as u32;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(DisplayError::InvalidSize { width, height });
    }
    Ok(())
}

/// Require a TrueColor root visual with `0xRRGGBB` masks and 32-bit pixels.
fn check_visual(conn: &RustConnection, screen_num: usize) -> Result<(), DisplayError> {
    let setup = conn.setup();
    let screen = &setup.roots[screen_num];

    let visual = screen
        .allowed_depths
        .iter()
        .flat_map(|d| d.visuals.iter())
        .find(|v| v.visual_id == screen.root_visual)
        .ok_or_else(|| DisplayError::UnsupportedVisual("root visual not listed".to_string()))?;

    if visual.class != VisualClass::TRUE_COLOR
        || (visual.red_mask, visual.green_mask, visual.blue_mask) != (0xff_0000, 0xff00, 0xff)
    {
        return Err(DisplayError::UnsupportedVisual(format!(
            "{:?} with masks {:06x}/{:06x}/{:06x}",
            visual.class, visual.red_mask, visual.green_mask, visual.blue_mask
        )));
    }

    let bpp = setup
        .pixmap_formats
        .iter()
        .find(|f| f.depth == screen.root_depth)
        .map(|f| f.bits_per_pixel);
    if bpp != Some(32) {
        return Err(DisplayError::UnsupportedVisual(format!(
            "depth {} uses {:?} bits per pixel",
            screen.root_depth, bpp
        )));
    }
    Ok(())
}

/// Split `rect` into full-width strips whose pixel data fits one request.
fn strips(rect: Rect, max_request_bytes: usize) -> impl Iterator<Item = Rect> {
    let row_bytes = (rect.width.max(1) as usize) * BYTES_PER_PIXEL;
    let rows = (max_request_bytes.saturating_sub(REQUEST_HEADER_BYTES) / row_bytes).max(1) as i32;
    let count = if rect.is_empty() {
        0
    } else {
        (rect.height + rows - 1) / rows
    };
    (0..count).map(move |i| {
        let y = rect.y + i * rows;
        Rect::new(rect.x, y, rect.width, rows.min(rect.bottom() - y))
    })
}

fn decode_pixels(data: &[u8], order: ImageOrder) -> Vec<u32> {
    data.chunks_exact(BYTES_PER_PIXEL)
        .map(|b| {
            let bytes = [b[0], b[1], b[2], b[3]];
            let pixel = if order == ImageOrder::MSB_FIRST {
                u32::from_be_bytes(bytes)
            } else {
                u32::from_le_bytes(bytes)
            };
            pixel & 0x00ff_ffff
        })
        .collect()
}

fn encode_pixels(pixels: &[u32], order: ImageOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * BYTES_PER_PIXEL);
    for &p in pixels {
        if order == ImageOrder::MSB_FIRST {
            out.extend_from_slice(&p.to_be_bytes());
        } else {
            out.extend_from_slice(&p.to_le_bytes());
        }
    }
    out
}
