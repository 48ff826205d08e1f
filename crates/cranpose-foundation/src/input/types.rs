use std::fmt;
use std::rc::Rc;

/// Input device class that produced a pointer interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputModality {
    /// No interaction has been accepted yet.
    #[default]
    Undefined,
    Mouse,
    Touch,
}

impl fmt::Display for InputModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputModality::Undefined => "undefined",
            InputModality::Mouse => "mouse",
            InputModality::Touch => "touch",
        };
        f.write_str(name)
    }
}

/// Pointer-down callback. Returning `false` rejects the interaction.
pub type PointerDownCallback<E> = Rc<dyn Fn(&E, InputModality) -> bool>;

/// Pointer-move and pointer-up callback.
pub type PointerCallback<E> = Rc<dyn Fn(&E, InputModality)>;
