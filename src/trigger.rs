//! Emulation of the dilepton trigger, for inputs which lack trigger decisions

use crate::{dilepton::Channel, numeric::Float, random::RandomGenerator};

/// Per-channel dilepton trigger efficiencies
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerEmulator {
    /// Efficiency for events with two electrons
    pub electron_electron: Float,

    /// Efficiency for events with two muons
    pub muon_muon: Float,

    /// Efficiency for events with one electron and one muon
    pub electron_muon: Float,
}
//
impl TriggerEmulator {
    /// Set up the emulator with explicit efficiencies
    pub fn new(electron_electron: Float, muon_muon: Float, electron_muon: Float) -> Self {
        for eff in [electron_electron, muon_muon, electron_muon] {
            assert!((0. ..=1.).contains(&eff), "Efficiencies must lie in [0, 1]");
        }
        Self {
            electron_electron,
            muon_muon,
            electron_muon,
        }
    }

    /// Efficiency of the trigger for a given channel
    pub fn efficiency(&self, channel: Channel) -> Float {
        match channel {
            Channel::ElectronElectron => self.electron_electron,
            Channel::MuonMuon => self.muon_muon,
            Channel::ElectronMuon => self.electron_muon,
        }
    }

    /// Decide whether an event of a given channel fired the trigger
    pub fn accepts(&self, channel: Channel, rng: &mut RandomGenerator) -> bool {
        rng.random() < self.efficiency(channel)
    }
}

impl Default for TriggerEmulator {
    fn default() -> Self {
        Self::new(0.97, 0.89, 0.75)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_efficiencies() {
        let trigger = TriggerEmulator::default();
        assert_eq!(trigger.efficiency(Channel::ElectronElectron), 0.97);
        assert_eq!(trigger.efficiency(Channel::MuonMuon), 0.89);
        assert_eq!(trigger.efficiency(Channel::ElectronMuon), 0.75);
    }

    #[test]
    fn extreme_efficiencies_are_deterministic() {
        let mut rng = RandomGenerator::new(3);
        let always = TriggerEmulator::new(1., 1., 1.);
        let never = TriggerEmulator::new(0., 0., 0.);
        for _ in 0..100 {
            assert!(always.accepts(Channel::MuonMuon, &mut rng));
            assert!(!never.accepts(Channel::ElectronMuon, &mut rng));
        }
    }

    #[test]
    fn acceptance_rate_follows_efficiency() {
        let mut rng = RandomGenerator::new(11);
        let trigger = TriggerEmulator::default();
        let accepted = (0..20_000)
            .filter(|_| trigger.accepts(Channel::ElectronMuon, &mut rng))
            .count();
        let rate = accepted as Float / 20_000.;
        assert!((rate - 0.75).abs() < 0.02, "rate was {rate}");
    }
}
