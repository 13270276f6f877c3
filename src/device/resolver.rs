//! Device identity resolution.
//!
//! # Responsibilities
//! - Turn the symbolic `DevicePackageName` into concrete device attributes
//! - Replace an unset or placeholder device id
//!
//! # Design Decisions
//! - `custom` is never touched: operator-supplied attributes are trusted as-is
//! - A named Android profile keeps the pre-existing device id; a random pick
//!   adopts the profile's id too
//! - A random Android pick rewrites the selector to the chosen key, so the
//!   next load resolves the same profile
//! - iOS has no keyed table; only `random` is acted upon

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::config::model::{DeviceConfig, DevicePlatform, PackageSelector};
use crate::device::catalog::DeviceCatalog;
use crate::device::id::generate_device_id;
use crate::device::DeviceError;

/// Resolves `device` in place using the thread-local RNG for profile picks.
pub fn resolve_device(device: &mut DeviceConfig, catalog: &DeviceCatalog) -> Result<(), DeviceError> {
    resolve_device_with(device, catalog, &mut rand::thread_rng())
}

/// Resolves `device` in place, drawing profile picks from `rng`.
///
/// The device id, when it still needs generating afterwards, always comes
/// from the OS CSPRNG regardless of `rng`.
pub fn resolve_device_with<R: Rng + ?Sized>(
    device: &mut DeviceConfig,
    catalog: &DeviceCatalog,
    rng: &mut R,
) -> Result<(), DeviceError> {
    match device.device_platform {
        DevicePlatform::Ios => resolve_ios(device, catalog, rng)?,
        DevicePlatform::Android => resolve_android(device, catalog, rng)?,
    }

    if device.needs_device_id() {
        device.device_id = generate_device_id();
        tracing::debug!("Generated a new device id");
    }
    Ok(())
}

fn resolve_ios<R: Rng + ?Sized>(
    device: &mut DeviceConfig,
    catalog: &DeviceCatalog,
    rng: &mut R,
) -> Result<(), DeviceError> {
    if device.device_package_name != PackageSelector::Random {
        return Ok(());
    }

    let info = catalog.ios().choose(rng).ok_or(DeviceError::EmptyCatalog("ios"))?;
    info.apply_to(device);
    tracing::info!(model = %info.device_model_boot, "Picked a random iOS device");
    Ok(())
}

fn resolve_android<R: Rng + ?Sized>(
    device: &mut DeviceConfig,
    catalog: &DeviceCatalog,
    rng: &mut R,
) -> Result<(), DeviceError> {
    if let PackageSelector::Named(key) = &device.device_package_name {
        let info = catalog
            .android(key)
            .ok_or_else(|| DeviceError::UnknownPackage(key.clone()))?;
        let keep_id = std::mem::take(&mut device.device_id);
        info.apply_to(device);
        device.device_id = keep_id;
    }

    if device.device_package_name == PackageSelector::Random {
        let key = catalog
            .android_keys()
            .choose(rng)
            .ok_or(DeviceError::EmptyCatalog("android"))?
            .to_string();
        if let Some(info) = catalog.android(&key) {
            info.apply_to(device);
        }
        tracing::info!(package = %key, "Picked a random Android device package");
        device.device_package_name = PackageSelector::Named(key);
    }
    Ok(())
}
