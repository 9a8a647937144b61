/// Press of `code` with exactly `mods` held, usable as pattern or expression
#[doc(hidden)]
#[macro_export]
macro_rules! key_with {
    ($mods:ident, $($code:tt)+) => {
        ::crossterm::event::KeyEvent {
            code: $($code)+,
            modifiers: ::crossterm::event::KeyModifiers::$mods,
            kind: ::crossterm::event::KeyEventKind::Press,
            state: ::crossterm::event::KeyEventState::NONE,
        }
    };
}

/// `key!('q')` or `key!(Esc)`
#[macro_export]
macro_rules! key {
    ($key:literal) => {
        $crate::key_with!(NONE, ::crossterm::event::KeyCode::Char($key))
    };
    ($key:ident) => {
        $crate::key_with!(NONE, ::crossterm::event::KeyCode::$key)
    };
}

/// `ctrl!('c')`
#[macro_export]
macro_rules! ctrl {
    ($key:literal) => {
        $crate::key_with!(CONTROL, ::crossterm::event::KeyCode::Char($key))
    };
    ($key:ident) => {
        $crate::key_with!(CONTROL, ::crossterm::event::KeyCode::$key)
    };
}
