//! Canonical name patterns.
//!
//! Supported placeholders:
//! - `${Partition}` - `Core` for base scopes, `App` for extensions
//! - `${Cosmos}` - root scope name
//! - `${Galaxy}` - second-level scope name
//! - `${SolarSystem}` - third-level scope name
//! - `${Type}` - resource label passed by the caller

pub const SINGLETON_COSMOS: &str = "${Partition}-${Type}";
pub const SINGLETON_GALAXY: &str = "${Partition}-${Galaxy}-${Type}";
pub const SINGLETON_SOLAR_SYSTEM: &str = "${Partition}-${Galaxy}-${SolarSystem}-${Type}";
pub const COSMOS: &str = "${Partition}-${Cosmos}-${Type}";
pub const GALAXY: &str = "${Partition}-${Cosmos}-${Galaxy}-${Type}";
pub const SOLAR_SYSTEM: &str = "${Partition}-${Cosmos}-${Galaxy}-${SolarSystem}-${Type}";
pub const SHORT_SOLAR_SYSTEM: &str = "${Partition}-${Cosmos}-${SolarSystem}-${Type}";
pub const DOCKER_TAG: &str = "${Cosmos}/${Type}";
pub const LOG_GROUP: &str = "${Partition}/${Cosmos}/${SolarSystem}/${Type}";

/// Every catalog entry as `(name, template)`.
pub const ALL: &[(&str, &str)] = &[
    ("SINGLETON_COSMOS", SINGLETON_COSMOS),
    ("SINGLETON_GALAXY", SINGLETON_GALAXY),
    ("SINGLETON_SOLAR_SYSTEM", SINGLETON_SOLAR_SYSTEM),
    ("COSMOS", COSMOS),
    ("GALAXY", GALAXY),
    ("SOLAR_SYSTEM", SOLAR_SYSTEM),
    ("SHORT_SOLAR_SYSTEM", SHORT_SOLAR_SYSTEM),
    ("DOCKER_TAG", DOCKER_TAG),
    ("LOG_GROUP", LOG_GROUP),
];

/// Look up a template by its catalog name.
pub fn lookup(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, template)| *template)
}
