use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::Graphics::Dwm::DwmSetWindowAttribute;
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetWindowLongPtrW, SetWindowLongPtrW, SetWindowPos, GWL_EXSTYLE,
    SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, WS_EX_NOACTIVATE,
    WS_EX_TOOLWINDOW,
};

/// Extract the Win32 HWND from a winit window.
pub fn get_hwnd(window: &winit::window::Window) -> Option<HWND> {
    let handle = window.window_handle().ok()?;
    match handle.as_raw() {
        RawWindowHandle::Win32(h) => Some(HWND(h.hwnd.get() as *mut core::ffi::c_void)),
        _ => None,
    }
}

/// Apply overlay window styles for a transparent desktop pet.
pub unsafe fn make_overlay(hwnd: HWND) {
    let style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
    log::info!("Window ex-style before: 0x{:08X}", style);

    // Drop WS_EX_LAYERED and skip the GDI redirection surface; all pixels
    // come from the DirectComposition visual wgpu creates via DxgiFromVisual.
    const WS_EX_LAYERED: isize = 0x00080000;
    const WS_EX_NOREDIRECTIONBITMAP: isize = 0x00200000;

    let new_style = (style & !WS_EX_LAYERED)
        | WS_EX_NOACTIVATE.0 as isize
        | WS_EX_TOOLWINDOW.0 as isize
        | WS_EX_NOREDIRECTIONBITMAP;
    SetWindowLongPtrW(hwnd, GWL_EXSTYLE, new_style);

    log::info!("Window ex-style after:  0x{:08X}", new_style);

    // Make DWM pick up the new styles instead of cached frame info.
    let _ = SetWindowPos(
        hwnd,
        HWND::default(),
        0,
        0,
        0,
        0,
        SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
    );

    // (attribute, value): no non-client rendering, square corners,
    // no border color, no Mica/Acrylic backdrop.
    const DWM_ATTRS: [(i32, u32); 4] = [(2, 2), (33, 1), (34, 0xFFFFFFFE), (38, 1)];
    for (attr, value) in DWM_ATTRS {
        let _ = DwmSetWindowAttribute(
            hwnd,
            windows::Win32::Graphics::Dwm::DWMWINDOWATTRIBUTE(attr),
            &value as *const u32 as *const core::ffi::c_void,
            4,
        );
    }
}

/// Turn the window into a transparent, click-through, always-on-top overlay.
///
/// Hit-testing starts disabled; the host re-enables it while the cursor is
/// over the pet.
pub fn setup_overlay(window: &winit::window::Window) {
    if let Err(e) = window.set_cursor_hittest(false) {
        log::warn!("Could not disable cursor hittest: {e}");
    }

    let Some(hwnd) = get_hwnd(window) else {
        log::warn!("No Win32 handle, overlay styles not applied");
        return;
    };
    unsafe {
        make_overlay(hwnd);
    }

    log::info!("Win32 overlay setup complete (DirectComposition + click-through + toolwindow)");
}

/// Global mouse cursor position in screen pixels.
///
/// The overlay covers the monitor from (0, 0), so this is also viewport space.
pub fn get_mouse_pos() -> (f32, f32) {
    let mut point = POINT::default();
    unsafe {
        let _ = GetCursorPos(&mut point);
    }
    (point.x as f32, point.y as f32)
}

/// Check if the ESC key is currently pressed (works regardless of window focus).
pub fn is_escape_pressed() -> bool {
    // VK_ESCAPE = 0x1B. High bit set = key is currently down.
    unsafe { GetAsyncKeyState(0x1B) & (0x8000u16 as i16) != 0 }
}
