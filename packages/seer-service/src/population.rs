use std::collections::HashMap;

use seer_domain::Owner;

/// An immutable snapshot of the ranked population, in attribute-store order.
#[derive(Debug, Default)]
pub struct Population {
	owners: Vec<Owner>,
	positions: HashMap<String, usize>,
}
impl Population {
	/// Later duplicates of an owner id are dropped so each owner appears once.
	pub fn new(owners: impl IntoIterator<Item = Owner>) -> Self {
		let mut kept = Vec::new();
		let mut positions = HashMap::new();

		for owner in owners {
			if positions.contains_key(&owner.owner_id) {
				continue;
			}

			positions.insert(owner.owner_id.clone(), kept.len());
			kept.push(owner);
		}

		Self { owners: kept, positions }
	}

	pub fn owners(&self) -> &[Owner] {
		&self.owners
	}

	pub fn len(&self) -> usize {
		self.owners.len()
	}

	pub fn is_empty(&self) -> bool {
		self.owners.is_empty()
	}

	pub fn contains(&self, owner_id: &str) -> bool {
		self.positions.contains_key(owner_id)
	}

	pub fn get(&self, owner_id: &str) -> Option<&Owner> {
		self.positions.get(owner_id).map(|index| &self.owners[*index])
	}
}
