use crate::blueprint::{DrawerItem, DrawerNode, NavNode, ScreenRef, StackNode, TabItem, TabsNode};

/// The NavVisitor trait is the single traversal mechanism for navigation trees.
///
/// Rules:
/// 1. Traversal is depth-first, children in declaration order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call the matching `walk_*` function to continue
///    traversal unless pruning is intended.
/// 4. No manual recursion over `NavNode` outside of this module.
pub trait NavVisitor<'a> {
    fn visit_node(&mut self, node: &'a NavNode) {
        walk_node(self, node);
    }

    fn visit_screen(&mut self, _screen: &'a ScreenRef) {
        // Leaf node, nothing to walk
    }

    fn visit_stack(&mut self, stack: &'a StackNode) {
        walk_stack(self, stack);
    }

    fn visit_tabs(&mut self, tabs: &'a TabsNode) {
        walk_tabs(self, tabs);
    }

    fn visit_tab(&mut self, tab: &'a TabItem) {
        self.visit_node(&tab.child);
    }

    fn visit_drawer(&mut self, drawer: &'a DrawerNode) {
        walk_drawer(self, drawer);
    }

    fn visit_drawer_item(&mut self, item: &'a DrawerItem) {
        self.visit_node(&item.child);
    }
}

pub fn walk_node<'a, V: NavVisitor<'a> + ?Sized>(visitor: &mut V, node: &'a NavNode) {
    match node {
        NavNode::Screen(s) => visitor.visit_screen(s),
        NavNode::Stack(s) => visitor.visit_stack(s),
        NavNode::Tabs(t) => visitor.visit_tabs(t),
        NavNode::Drawer(d) => visitor.visit_drawer(d),
    }
}

pub fn walk_stack<'a, V: NavVisitor<'a> + ?Sized>(visitor: &mut V, stack: &'a StackNode) {
    for child in &stack.children {
        visitor.visit_node(child);
    }
}

pub fn walk_tabs<'a, V: NavVisitor<'a> + ?Sized>(visitor: &mut V, tabs: &'a TabsNode) {
    for tab in &tabs.children {
        visitor.visit_tab(tab);
    }
}

pub fn walk_drawer<'a, V: NavVisitor<'a> + ?Sized>(visitor: &mut V, drawer: &'a DrawerNode) {
    for item in &drawer.children {
        visitor.visit_drawer_item(item);
    }
}
