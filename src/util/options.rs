//! Runtime options.
//!
//! Options start from their defaults. Any environment variable named `GCSCAN_<OPTION>` (for
//! example `GCSCAN_ARRAY_SPLIT_AMOUNT`) overrides the default if its value parses and
//! validates. Invalid values are logged and ignored.

use crate::util::constants::DEFAULT_ARRAY_SPLIT_AMOUNT;

fn always_valid<T>(_: &T) -> bool {
    true
}

macro_rules! options {
    ($($(#[$outer:meta])* $name:ident: $type:ty[$validator:expr] = $default:expr),*,) => [
        options!($($(#[$outer])* $name: $type[$validator] = $default),*);
    ];
    ($($(#[$outer:meta])* $name:ident: $type:ty[$validator:expr] = $default:expr),*) => [
        /// Options for gcscan and the collector drivers built on it.
        #[derive(Clone, Debug)]
        pub struct Options {
            $($(#[$outer])* pub $name: $type),*
        }
        impl Options {
            /// Set an option by its snake case name. Returns `true` if the value was parsed,
            /// validated and applied. The old value is kept otherwise.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by calling set_from_str()) to the right type
                    $(stringify!($name) => if let Ok(ref val) = val.parse::<$type>() {
                        let validate_fn = $validator;
                        let is_valid = validate_fn(val);
                        if is_valid {
                            self.$name = val.clone();
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. The old value will be kept.", s, val);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Can't parse value. The old value will be kept.", s, val);
                        false
                    })*
                    _ => {
                        warn!("Unknown option {}", s);
                        false
                    }
                }
            }

            /// Read `GCSCAN_*` environment variables and apply the ones that name an option.
            pub fn read_env_var_settings(&mut self) {
                const PREFIX: &str = "GCSCAN_";
                for (key, val) in std::env::vars() {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { self.set_from_str(lowercase, &val); },)*
                            _ => debug!("Ignoring unknown environment variable {}", key),
                        }
                    }
                }
            }

            /// The built-in defaults, ignoring environment variables.
            pub fn builtin() -> Self {
                Options {
                    $($name: $default),*
                }
            }
        }
        impl Default for Options {
            fn default() -> Self {
                let mut options = Options::builtin();
                options.read_env_var_settings();
                options
            }
        }
    ]
}

options! {
    /// The number of array elements a fresh array scanner claims, and the amount drivers hand
    /// to `split_to` by default.
    array_split_amount: usize [|v: &usize| *v > 0] = DEFAULT_ARRAY_SPLIT_AMOUNT,
    /// Number of workers a driver should run.
    threads:            usize [|v: &usize| *v > 0] = num_cpus::get(),
    /// Log every segment fetched by a scanner at trace level.
    trace_segments:     bool  [always_valid]       = false,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_util::{serial_test, with_cleanup};

    #[test]
    fn no_env_var() {
        serial_test(|| {
            let options = Options::default();
            assert_eq!(options.array_split_amount, DEFAULT_ARRAY_SPLIT_AMOUNT);
            assert!(options.threads > 0);
        })
    }

    #[test]
    fn with_valid_env_var() {
        serial_test(|| {
            with_cleanup(
                || {
                    std::env::set_var("GCSCAN_ARRAY_SPLIT_AMOUNT", "4096");

                    let options = Options::default();
                    assert_eq!(options.array_split_amount, 4096);
                },
                || {
                    std::env::remove_var("GCSCAN_ARRAY_SPLIT_AMOUNT");
                },
            )
        })
    }

    #[test]
    fn with_multiple_valid_env_vars() {
        serial_test(|| {
            with_cleanup(
                || {
                    std::env::set_var("GCSCAN_THREADS", "3");
                    std::env::set_var("GCSCAN_TRACE_SEGMENTS", "true");

                    let options = Options::default();
                    assert_eq!(options.threads, 3);
                    assert!(options.trace_segments);
                },
                || {
                    std::env::remove_var("GCSCAN_THREADS");
                    std::env::remove_var("GCSCAN_TRACE_SEGMENTS");
                },
            )
        })
    }

    #[test]
    fn with_invalid_env_var_value() {
        serial_test(|| {
            with_cleanup(
                || {
                    // zero fails validation, so the default is kept
                    std::env::set_var("GCSCAN_ARRAY_SPLIT_AMOUNT", "0");
                    std::env::set_var("GCSCAN_THREADS", "abc");

                    let options = Options::default();
                    assert_eq!(options.array_split_amount, DEFAULT_ARRAY_SPLIT_AMOUNT);
                    assert_eq!(options.threads, num_cpus::get());
                },
                || {
                    std::env::remove_var("GCSCAN_ARRAY_SPLIT_AMOUNT");
                    std::env::remove_var("GCSCAN_THREADS");
                },
            )
        })
    }

    #[test]
    fn set_from_str_reports_result() {
        let mut options = Options::builtin();
        assert!(options.set_from_str("array_split_amount", "64"));
        assert_eq!(options.array_split_amount, 64);
        assert!(!options.set_from_str("array_split_amount", "-1"));
        assert_eq!(options.array_split_amount, 64);
        assert!(!options.set_from_str("no_such_option", "1"));
    }
}
