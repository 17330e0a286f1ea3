// courier/courier-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

/// Path prefixes that mark a message's content as a reference to an uploaded asset.
pub const IMAGE_PATH_PREFIX: &str = "/uploads/images/";
pub const FILE_PATH_PREFIX: &str = "/uploads/files/";
pub const AUDIO_PATH_PREFIX: &str = "/uploads/audio/";

/// A typed view onto the opaque content string of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageContent<'a> {
    Text(&'a str),
    Image { path: &'a str },
    File { path: &'a str },
    Audio { path: &'a str },
}

impl<'a> MessageContent<'a> {
    pub fn parse(content: &'a str) -> Self {
        if content.starts_with(IMAGE_PATH_PREFIX) {
            Self::Image { path: content }
        } else if content.starts_with(FILE_PATH_PREFIX) {
            Self::File { path: content }
        } else if content.starts_with(AUDIO_PATH_PREFIX) {
            Self::Audio { path: content }
        } else {
            Self::Text(content)
        }
    }

    pub fn is_attachment(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// The file name of an attachment, i.e. the last path segment.
    pub fn file_name(&self) -> Option<&'a str> {
        match self {
            Self::Text(_) => None,
            Self::Image { path } | Self::File { path } | Self::Audio { path } => {
                path.rsplit('/').next().filter(|name| !name.is_empty())
            }
        }
    }
}
