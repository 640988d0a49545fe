// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::Path;

use tracing::info;

use crate::capabilities::CapabilityDetector;
use crate::dispatcher::Dispatcher;
use crate::platform;

mod device;
mod effect;
pub mod error;
mod haptics;
mod intensity;

pub use self::device::Device;
pub use self::effect::Effect;
pub use self::error::ConfigError;
pub use self::haptics::Haptics;
pub use self::intensity::{Intensity, Level};

/// Initializes the dispatcher from the given haptics config file. Returns the
/// dispatcher along with the configured fallback preference.
pub fn init_dispatcher(path: &Path) -> Result<(Dispatcher, bool), Box<dyn Error>> {
    let haptics = Haptics::deserialize(path)?;
    let device = platform::get_device(haptics.device())?;
    let capabilities = CapabilityDetector::new().detect(device.as_ref());
    let levels = haptics.levels()?;

    info!(device = %device, "Initialized haptics.");
    Ok((
        Dispatcher::new(device, capabilities, levels),
        haptics.fallback_to_plain_vibrate(),
    ))
}
