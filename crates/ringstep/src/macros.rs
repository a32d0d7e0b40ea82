/// Constructors and borrowed access shared by the string newtypes in
/// [`crate::step`].
macro_rules! impl_string_newtype {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $name {
                pub fn new(s: impl Into<String>) -> Self {
                    Self(s.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }

                /// Empty or whitespace only.
                pub fn is_blank(&self) -> bool {
                    self.0.trim().is_empty()
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self(s.to_owned())
                }
            }
        )+
    };
}

pub(crate) use impl_string_newtype;
