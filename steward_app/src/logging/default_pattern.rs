use log4rs::config::{Deserialize, Deserializers};
use log4rs::encode::Encode;
use log4rs::encode::pattern::PatternEncoder;

const WITH_TIME: &str = "[{d(%Y-%m-%d %H:%M:%S)(utc)} {h({l:<5})} {t}] {m}{n}";
const WITHOUT_TIME: &str = "[{h({l:<5})} {t}] {m}{n}";

#[derive(Debug, serde::Deserialize)]
pub struct PatternConfig {
    /// Whether to prefix records with a UTC timestamp.
    ///
    /// Hosts that stamp their own log lines can turn this off.
    #[serde(default = "default_time")]
    time: bool,
}

fn default_time() -> bool {
    true
}

pub struct PatternDeserializer;

impl Deserialize for PatternDeserializer {
    type Trait = dyn Encode;
    type Config = PatternConfig;

    fn deserialize(
        &self,
        config: Self::Config,
        _deserializers: &Deserializers,
    ) -> anyhow::Result<Box<Self::Trait>> {
        let pattern = if config.time { WITH_TIME } else { WITHOUT_TIME };
        Ok(Box::new(PatternEncoder::new(pattern)))
    }
}
