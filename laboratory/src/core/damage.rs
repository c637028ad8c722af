//! Damage values with stacked additive and multiplicative modifiers.
//!
//! Additive modifiers of a packet are summed before being applied once;
//! multiplicative modifiers (critical strikes and the like) compound.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Weapon,
    Skill,
    Magic,
    Physical,
    Projectile,
    Unarmed,
    OnHit,
    Minion,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Ice,
    Wind,
    Earth,
    Thunder,
    Water,
    Light,
    Darkness,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DamageError {
    #[error("damage value cannot be negative (got {0})")]
    NegativeValue(f64),
    #[error("coefficient cannot be negative (got {0})")]
    NegativeCoefficient(f64),
}

/// A single portion of damage with its own types and modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct DamagePacket {
    value: f64,
    types: Vec<DamageType>,
    element: Option<Element>,
    additive: f64,
    multiplicative: f64,
}

impl DamagePacket {
    pub fn new(value: f64, types: impl Into<Vec<DamageType>>) -> Self {
        Self {
            value,
            types: types.into(),
            element: None,
            additive: 0.0,
            multiplicative: 1.0,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the base value, keeping registered modifiers.
    pub fn set_value(&mut self, value: f64) -> Result<(), DamageError> {
        if value < 0.0 {
            return Err(DamageError::NegativeValue(value));
        }
        self.value = value;
        Ok(())
    }

    pub fn types(&self) -> &[DamageType] {
        &self.types
    }

    pub fn set_types(&mut self, types: impl Into<Vec<DamageType>>) {
        self.types = types.into();
    }

    pub fn has_type(&self, damage_type: DamageType) -> bool {
        self.types.contains(&damage_type)
    }

    pub fn element(&self) -> Option<Element> {
        self.element
    }

    pub fn set_element(&mut self, element: Option<Element>) {
        self.element = element;
    }

    /// Compound a multiplicative coefficient (`1.5` = +50%).
    pub fn multiplicative_modifier(&mut self, coefficient: f64) -> Result<(), DamageError> {
        if coefficient < 0.0 {
            return Err(DamageError::NegativeCoefficient(coefficient));
        }
        self.multiplicative *= coefficient;
        Ok(())
    }

    /// Add to the summed additive bonus (`0.1` = +10%, `-0.1` = -10%).
    pub fn additive_modifier(&mut self, multiplier: f64) {
        self.additive += multiplier;
    }

    /// The value after all modifiers; never negative.
    pub fn final_value(&self) -> f64 {
        self.value * (1.0 + self.additive).max(0.0) * self.multiplicative
    }
}

/// All packets of one hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DamageMetadata {
    packets: Vec<DamagePacket>,
}

impl DamageMetadata {
    /// A hit made of one packet.
    pub fn new(value: f64, types: impl Into<Vec<DamageType>>) -> Self {
        Self {
            packets: vec![DamagePacket::new(value, types)],
        }
    }

    pub fn from_packets(packets: Vec<DamagePacket>) -> Self {
        Self { packets }
    }

    pub fn packets(&self) -> &[DamagePacket] {
        &self.packets
    }

    pub fn add_packet(&mut self, packet: DamagePacket) {
        self.packets.push(packet);
    }

    /// Total final damage over every packet.
    pub fn damage(&self) -> f64 {
        self.packets.iter().map(DamagePacket::final_value).sum()
    }

    /// Total final damage of packets carrying `damage_type`.
    pub fn damage_of(&self, damage_type: DamageType) -> f64 {
        self.packets
            .iter()
            .filter(|packet| packet.has_type(damage_type))
            .map(DamagePacket::final_value)
            .sum()
    }

    pub fn has_type(&self, damage_type: DamageType) -> bool {
        self.packets.iter().any(|packet| packet.has_type(damage_type))
    }

    pub fn multiplicative_modifier(&mut self, coefficient: f64) -> Result<(), DamageError> {
        if coefficient < 0.0 {
            return Err(DamageError::NegativeCoefficient(coefficient));
        }
        for packet in &mut self.packets {
            packet.multiplicative_modifier(coefficient)?;
        }
        Ok(())
    }

    /// Apply a multiplicative coefficient to packets carrying `damage_type` only.
    pub fn multiplicative_modifier_for(
        &mut self,
        coefficient: f64,
        damage_type: DamageType,
    ) -> Result<(), DamageError> {
        if coefficient < 0.0 {
            return Err(DamageError::NegativeCoefficient(coefficient));
        }
        for packet in self.packets.iter_mut().filter(|p| p.has_type(damage_type)) {
            packet.multiplicative_modifier(coefficient)?;
        }
        Ok(())
    }

    pub fn additive_modifier(&mut self, multiplier: f64) {
        for packet in &mut self.packets {
            packet.additive_modifier(multiplier);
        }
    }

    pub fn additive_modifier_for(&mut self, multiplier: f64, damage_type: DamageType) {
        for packet in self.packets.iter_mut().filter(|p| p.has_type(damage_type)) {
            packet.additive_modifier(multiplier);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn multiplicative_modifiers_compound() {
        let mut metadata = DamageMetadata::new(24.0, [DamageType::Physical]);
        metadata.multiplicative_modifier(1.0 + 0.33 * 3.0).expect("strength");
        metadata.multiplicative_modifier(1.0 - 0.33 * 3.0).expect("weakness");
        assert_close(metadata.damage(), 24.0 * 1.99 * 0.01);
    }

    #[test]
    fn additive_modifiers_sum_before_applying() {
        let mut packet = DamagePacket::new(10.0, [DamageType::Weapon]);
        packet.additive_modifier(0.2);
        packet.additive_modifier(0.3);
        packet.multiplicative_modifier(2.0).expect("crit");
        assert_close(packet.final_value(), 10.0 * 1.5 * 2.0);
    }

    #[test]
    fn final_value_never_negative() {
        let mut packet = DamagePacket::new(10.0, [DamageType::Magic]);
        packet.additive_modifier(-3.0);
        assert_eq!(packet.final_value(), 0.0);
    }

    #[test]
    fn rejects_negative_inputs() {
        let mut packet = DamagePacket::new(10.0, [DamageType::Skill]);
        assert_eq!(packet.set_value(-1.0), Err(DamageError::NegativeValue(-1.0)));
        assert_eq!(
            packet.multiplicative_modifier(-0.5),
            Err(DamageError::NegativeCoefficient(-0.5))
        );
        assert_eq!(packet.value(), 10.0);
        packet.set_value(4.0).expect("set");
        assert_eq!(packet.final_value(), 4.0);
    }

    #[test]
    fn typed_modifiers_touch_matching_packets_only() {
        let mut metadata = DamageMetadata::from_packets(vec![
            DamagePacket::new(10.0, [DamageType::Physical, DamageType::Weapon]),
            DamagePacket::new(5.0, [DamageType::Magic]).with_element(Element::Fire),
        ]);
        metadata
            .multiplicative_modifier_for(2.0, DamageType::Magic)
            .expect("magic");
        metadata.additive_modifier_for(0.5, DamageType::Weapon);

        assert_close(metadata.damage_of(DamageType::Magic), 10.0);
        assert_close(metadata.damage_of(DamageType::Weapon), 15.0);
        assert_close(metadata.damage(), 25.0);
        assert!(metadata.has_type(DamageType::Physical));
        assert!(!metadata.has_type(DamageType::Dot));
        assert_eq!(metadata.packets()[1].element(), Some(Element::Fire));
    }

    #[test]
    fn cloned_packet_is_independent() {
        let mut original = DamagePacket::new(8.0, [DamageType::Projectile]);
        original.additive_modifier(0.25);
        let mut copy = original.clone();
        copy.additive_modifier(0.75);
        assert_close(original.final_value(), 10.0);
        assert_close(copy.final_value(), 16.0);
    }
}
