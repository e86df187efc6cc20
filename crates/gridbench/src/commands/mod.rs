pub mod backup;
pub mod deploy;
pub mod destroy;
pub mod emulate;
pub mod info;
pub mod openstack;
pub mod rally;
pub mod stress;
pub mod validate;
