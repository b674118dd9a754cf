use std::string::FromUtf8Error;
use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum SimplifyError {
    XmlParse(quick_xml::Error),
    Io(std::io::Error),
    Utf8(FromUtf8Error),
    NotGpx {
        root: Option<String>,
    },
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    UnexpectedEof {
        element: &'static str,
    },
    InvalidOption {
        option: &'static str,
        reason: String,
    },
}

impl std::fmt::Display for SimplifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XmlParse(e) => write!(f, "XML parse error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Utf8(e) => write!(f, "Output is not valid UTF-8: {e}"),
            Self::NotGpx { root: Some(root) } => {
                write!(f, "Not a GPX document: root element is <{root}>")
            }
            Self::NotGpx { root: None } => write!(f, "Not a GPX document: no root element"),
            Self::MissingAttribute { element, attribute } => {
                write!(f, "Missing attribute '{attribute}' on <{element}>")
            }
            Self::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "Invalid value '{value}' for attribute '{attribute}' on <{element}>"
            ),
            Self::UnexpectedEof { element } => {
                write!(f, "Unexpected end of input inside <{element}>")
            }
            Self::InvalidOption { option, reason } => {
                write!(f, "Invalid option '{option}': {reason}")
            }
        }
    }
}

impl std::error::Error for SimplifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::XmlParse(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for SimplifyError {
    fn from(e: quick_xml::Error) -> Self {
        Self::XmlParse(e)
    }
}

impl From<std::io::Error> for SimplifyError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<FromUtf8Error> for SimplifyError {
    fn from(e: FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}

impl From<SimplifyError> for JsValue {
    fn from(e: SimplifyError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
