//! Typed extraction of resolved command options.

use serenity::model::application::ResolvedValue;
use serenity::model::channel::PartialChannel;
use serenity::model::user::User;

use crate::error::Error;

/// A type that can be extracted from a resolved slash command option.
pub trait SlashArg<'ctx>: Sized {
    /// Extracts the value from the resolved option.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructureMismatch`] if the option has a different type.
    fn extract(resolved: &ResolvedValue<'ctx>) -> Result<Self, Error>;
}

macro_rules! impl_slash {
    ($l:lifetime $ty:ty => |$opt:ident ( $($resolved:pat),* )| $out:expr) => {
        impl<$l> SlashArg<$l> for $ty {
            fn extract(resolved: &ResolvedValue<$l>) -> Result<Self, Error> {
                match *resolved {
                    ResolvedValue::$opt( $($resolved),* ) => Ok( $out ),
                    _ => Err(Error::structure_mismatch(concat!("expected ", stringify!($opt)))),
                }
            }
        }
    };
}

impl_slash!('ctx &'ctx str => |String(x)| x);
impl_slash!('ctx &'ctx User => |User(user, _)| user);
impl_slash!('ctx &'ctx PartialChannel => |Channel(channel)| channel);
