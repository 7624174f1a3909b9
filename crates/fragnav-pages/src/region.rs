//! Region registry.
//!
//! A region is a persistent container element of the page shell that
//! fragments can target. The set of region names is closed, and the bindings
//! are made once at startup.

use std::fmt;

/// Logical name of a shell region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionName {
	/// `<header>`
	Header,
	/// `<nav>`
	Nav,
	/// `<main>`
	Main,
	/// `<footer>`
	Footer,
	/// `<body>`
	Body,
}

impl RegionName {
	/// All region names, in shell order.
	pub const ALL: [RegionName; 5] = [
		RegionName::Header,
		RegionName::Nav,
		RegionName::Main,
		RegionName::Footer,
		RegionName::Body,
	];

	/// Maps a lowercase tag name to a region name.
	///
	/// Parsed HTML always reports lowercase tag names, so no case folding is
	/// done here.
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"header" => Some(Self::Header),
			"nav" => Some(Self::Nav),
			"main" => Some(Self::Main),
			"footer" => Some(Self::Footer),
			"body" => Some(Self::Body),
			_ => None,
		}
	}

	/// The tag name (and CSS selector) of this region.
	pub fn tag(self) -> &'static str {
		match self {
			Self::Header => "header",
			Self::Nav => "nav",
			Self::Main => "main",
			Self::Footer => "footer",
			Self::Body => "body",
		}
	}
}

impl fmt::Display for RegionName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.tag())
	}
}

/// A resolved region: its name and the live element bound to it.
#[derive(Debug)]
pub struct Region<'a, E> {
	name: RegionName,
	element: &'a E,
}

impl<'a, E> Region<'a, E> {
	/// The region's name.
	pub fn name(&self) -> RegionName {
		self.name
	}

	/// The live element bound to the region.
	pub fn element(&self) -> &'a E {
		self.element
	}
}

/// Fixed mapping from region names to live elements.
#[derive(Debug, Clone)]
pub struct RegionRegistry<E> {
	bindings: Vec<(RegionName, E)>,
}

impl<E> RegionRegistry<E> {
	/// Binds every region name through `locate`.
	///
	/// Names for which `locate` returns `None` stay unbound for the lifetime
	/// of the registry.
	pub fn bind<F>(mut locate: F) -> Self
	where
		F: FnMut(RegionName) -> Option<E>,
	{
		let bindings = RegionName::ALL
			.into_iter()
			.filter_map(|name| locate(name).map(|element| (name, element)))
			.collect();
		Self { bindings }
	}

	/// Looks up the region addressed by a tag name.
	pub fn resolve(&self, tag: &str) -> Option<Region<'_, E>> {
		let name = RegionName::from_tag(tag)?;
		self.get(name).map(|element| Region { name, element })
	}

	/// Returns the element bound to `name`.
	pub fn get(&self, name: RegionName) -> Option<&E> {
		self.bindings
			.iter()
			.find(|(bound, _)| *bound == name)
			.map(|(_, element)| element)
	}

	/// Returns `true` if `name` is bound.
	pub fn contains(&self, name: RegionName) -> bool {
		self.get(name).is_some()
	}

	/// Iterates over the bound regions in shell order.
	pub fn iter(&self) -> impl Iterator<Item = Region<'_, E>> {
		self.bindings
			.iter()
			.map(|(name, element)| Region { name: *name, element })
	}

	/// Number of bound regions.
	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	/// Returns `true` if no region is bound.
	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}
