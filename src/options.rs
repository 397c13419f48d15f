//! Launch options read from the process arguments.
//!
//! Accepts the query-string form `magic_word=abracadabra` (optionally with a
//! leading `?` and other `&`-joined pairs, percent-encoded as in a URL) as
//! well as `--magic-word <word>` and `--magic-word=<word>`.

use url::form_urlencoded;

const MAGIC_WORD: &str = "abracadabra";
const QUERY_KEY: &str = "magic_word";
const FLAG: &str = "--magic-word";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct LaunchOptions {
    pub(crate) magic: bool,
}

impl LaunchOptions {
    pub(crate) fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let word = if arg == FLAG {
                let Some(value) = args.next() else {
                    log::warn!("{FLAG} given without a value");
                    break;
                };
                Some(value)
            } else if let Some(value) = flag_value(&arg) {
                Some(value.to_owned())
            } else {
                let value = query_value(&arg);
                if value.is_none() {
                    log::warn!("ignoring unrecognised argument {arg:?}");
                }
                value
            };

            if let Some(word) = word {
                options.apply_magic_word(&word);
            }
        }

        options
    }

    fn apply_magic_word(&mut self, word: &str) {
        if word == MAGIC_WORD {
            self.magic = true;
        } else {
            log::debug!("magic word {word:?} rejected");
        }
    }
}

fn flag_value(arg: &str) -> Option<&str> {
    arg.strip_prefix(FLAG)?.strip_prefix('=')
}

/// Finds `magic_word=...` inside a query-string style argument, decoded.
fn query_value(arg: &str) -> Option<String> {
    form_urlencoded::parse(arg.trim_start_matches('?').as_bytes())
        .find(|(key, _)| *key == QUERY_KEY)
        .map(|(_, value)| value.into_owned())
}
