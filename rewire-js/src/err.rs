use crate::emit::EmitError;
use crate::error::SyntaxError;
use crate::template::TemplateError;
use core::fmt;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::Utf8Error;

#[derive(Clone, Debug)]
pub enum RewireError {
  InvalidUtf8(Utf8Error),
  Syntax(SyntaxError),
  /// A replacement fragment failed to build. Indicates a bug in a template, not bad input.
  Template(TemplateError),
  Emit(EmitError),
}

impl Display for RewireError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      RewireError::InvalidUtf8(err) => write!(f, "source is not valid UTF-8: {}", err),
      RewireError::Syntax(err) => write!(f, "failed to parse source: {}", err),
      RewireError::Template(err) => write!(f, "failed to build replacement: {}", err),
      RewireError::Emit(err) => write!(f, "failed to emit output: {}", err),
    }
  }
}

impl Error for RewireError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      RewireError::InvalidUtf8(err) => Some(err),
      RewireError::Syntax(err) => Some(err),
      RewireError::Template(err) => Some(err),
      RewireError::Emit(err) => Some(err),
    }
  }
}

impl From<TemplateError> for RewireError {
  fn from(err: TemplateError) -> Self {
    RewireError::Template(err)
  }
}
