use rdkafka::ClientConfig;
use typed_builder::TypedBuilder;

use crate::bus::kafka::error::KafkaEventBusError;

#[derive(TypedBuilder)]
pub struct KafkaEventBusConfig<'a> {
    /// Comma separated list of Kafka brokers, as `host:port`.
    pub(crate) broker_url_list: &'a str,
    /// Topic every event gets published on.
    pub(crate) topic: &'a str,
    /// SASL credentials, when the brokers require them.
    #[builder(default, setter(strip_option))]
    pub(crate) security: Option<Security<'a>>,
    /// How long, in milliseconds, a publish waits for the brokers to acknowledge.
    #[builder(default = 5000)]
    pub(crate) request_timeout: u64,
    /// Extra producer settings, applied before the ones above.
    #[builder(default, setter(strip_option))]
    pub(crate) client_config: Option<ClientConfig>,
    /// Called with every publish failure. Failures are otherwise only logged.
    #[builder(default = Box::new(| _ | ()))]
    pub(crate) error_handler: Box<dyn Fn(KafkaEventBusError) + Send + Sync>,
}

pub struct Security<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
    pub(crate) sasl_mechanism: &'a str,
}

impl<'a> Security<'a> {
    pub fn new(username: &'a str, password: &'a str, sasl_mechanism: &'a str) -> Self {
        Self {
            username,
            password,
            sasl_mechanism,
        }
    }
}
