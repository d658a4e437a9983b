use serde::{Deserialize, Serialize};

/// One of the recognized ball colors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Red,
    Blue,
    Green,
}

impl ColorClass {
    /// All classes in output order.
    pub const ALL: [ColorClass; 3] = [ColorClass::Red, ColorClass::Blue, ColorClass::Green];

    pub fn name(self) -> &'static str {
        match self {
            ColorClass::Red => "red",
            ColorClass::Blue => "blue",
            ColorClass::Green => "green",
        }
    }
}

impl std::fmt::Display for ColorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A value stored once per [`ColorClass`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerClass<T> {
    pub red: T,
    pub blue: T,
    pub green: T,
}

impl<T> PerClass<T> {
    pub fn new(red: T, blue: T, green: T) -> Self {
        Self { red, blue, green }
    }

    /// Build a value for every class from a closure.
    pub fn from_fn(mut f: impl FnMut(ColorClass) -> T) -> Self {
        Self {
            red: f(ColorClass::Red),
            blue: f(ColorClass::Blue),
            green: f(ColorClass::Green),
        }
    }

    pub fn get(&self, class: ColorClass) -> &T {
        match class {
            ColorClass::Red => &self.red,
            ColorClass::Blue => &self.blue,
            ColorClass::Green => &self.green,
        }
    }

    pub fn get_mut(&mut self, class: ColorClass) -> &mut T {
        match class {
            ColorClass::Red => &mut self.red,
            ColorClass::Blue => &mut self.blue,
            ColorClass::Green => &mut self.green,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(ColorClass, T) -> U) -> PerClass<U> {
        PerClass {
            red: f(ColorClass::Red, self.red),
            blue: f(ColorClass::Blue, self.blue),
            green: f(ColorClass::Green, self.green),
        }
    }

    pub fn as_ref(&self) -> PerClass<&T> {
        PerClass {
            red: &self.red,
            blue: &self.blue,
            green: &self.green,
        }
    }

    /// Iterate `(class, value)` pairs in [`ColorClass::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorClass, &T)> {
        ColorClass::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}
