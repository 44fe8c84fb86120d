//! Custom [`log4rs`] components.
//!
//! Both are registered under the kind `"default"`, one as an appender and one
//! as an encoder, so the shipped config can stay short.

use log4rs::config::Deserializers;

mod default_appender;
mod default_pattern;

/// Stack buffer size for a single log record.
const WRITE_BUF_SIZE: usize = 1024;

/// Gets the log4rs deserializers including the custom components.
pub fn deserializers() -> Deserializers {
    let mut d = Deserializers::new();
    d.insert("default", default_appender::StderrAppenderDeserializer);
    d.insert("default", default_pattern::PatternDeserializer);
    d
}
