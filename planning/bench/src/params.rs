//! Parameters that can be set from environment variables.
//!
//! They cover knobs that are rarely changed between two benchmark campaigns (which interpreter runs
//! the planner, under which module name it is installed) and thus do not deserve a command line
//! option. A parameter is read once, on first access:
//!
//! ```
//! use planbench::params::EnvParam;
//! static RETRIES: EnvParam<u32> = EnvParam::new("PLANBENCH_DOC_RETRIES", "3");
//! assert_eq!(*RETRIES.get_ref(), 3);
//! ```

use std::str::FromStr;

use once_cell::sync::OnceCell;

/// Interpreter used to start the planner.
pub static PYTHON: EnvParam<String> = EnvParam::new("PLANBENCH_PYTHON", "python");

/// Module name of the planner, started with `<python> -m <module>`.
pub static PLANNER_MODULE: EnvParam<String> = EnvParam::new("PLANBENCH_PLANNER_MODULE", "pyperplan");

pub struct EnvParam<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    /// Creates a parameter read from the environment variable `env`, falling back to `default`.
    pub const fn new(env: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            value: OnceCell::new(),
            env,
            default,
        }
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse(&self, raw: Option<&str>) -> T {
        if let Some(raw) = raw {
            match T::from_str(raw) {
                Ok(value) => return value,
                Err(_) => tracing::warn!(
                    "Invalid value \"{raw}\" for {}, using default \"{}\"",
                    self.env,
                    self.default
                ),
            }
        }
        match T::from_str(self.default) {
            Ok(value) => value,
            Err(_) => panic!("{}: invalid default value \"{}\"", self.env, self.default),
        }
    }

    /// Returns the value of the parameter, reading the environment on the first call.
    ///
    /// # Panic
    /// Panics if the variable is unset (or invalid) and the default value cannot be parsed.
    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| {
            let raw = std::env::var(self.env).ok();
            self.parse(raw.as_deref())
        })
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.get_ref().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlannerCommand;

    #[test]
    fn default_and_override() {
        static UNSET: EnvParam<u64> = EnvParam::new("PLANBENCH_TEST_UNSET_PARAM", "42");
        assert_eq!(UNSET.get(), 42);

        let param: EnvParam<u64> = EnvParam::new("PLANBENCH_TEST_PARSE", "7");
        assert_eq!(param.parse(Some("12")), 12);
        assert_eq!(param.parse(Some("twelve")), 7);
        assert_eq!(param.parse(None), 7);
    }

    #[test]
    fn planner_parameters() {
        assert_eq!(PYTHON.parse(None), "python");
        assert_eq!(PLANNER_MODULE.parse(None), "pyperplan");
        assert_eq!(PLANNER_MODULE.parse(Some("pyperplan_dev")), "pyperplan_dev");

        let command = PlannerCommand::default();
        assert_eq!(&command.program, PYTHON.get_ref());
        assert_eq!(command.args, ["-m".to_string(), PLANNER_MODULE.get()]);
    }
}
