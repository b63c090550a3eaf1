use typed_builder::TypedBuilder;

use crate::bus::redis::error::RedisEventBusError;

#[derive(TypedBuilder)]
pub struct RedisEventBusConfig<'a> {
    /// Connection url of the Redis server, e.g. `redis://127.0.0.1:6379`.
    pub(crate) url: &'a str,
    /// Pub/sub channel events are published on. Defaults to the aggregate name.
    #[builder(default, setter(strip_option))]
    pub(crate) channel: Option<&'a str>,
    /// Called with every publish failure. Failures are otherwise only logged.
    #[builder(default = Box::new(| _ | ()))]
    pub(crate) error_handler: Box<dyn Fn(RedisEventBusError) + Send + Sync>,
}
