//! Debug utilities for R-way trie troubleshooting.

use super::{Node, RwayTrie};

impl<V: std::fmt::Debug> RwayTrie<V> {
    /// Print the tree structure for debugging.
    pub fn debug_print(&self) {
        println!("=== R-way Trie Debug ===");
        println!(
            "Keys: {}, nodes: {}, radix: {}",
            self.size,
            self.nodes,
            self.config.alphabet.radix()
        );
        self.debug_node(&self.root, 0);
        println!("========================");
    }

    fn debug_node(&self, node: &Node<V>, depth: usize) {
        let indent = "  ".repeat(depth);
        match node.value {
            Some(ref v) => println!("{}* {:?} (children={})", indent, v, node.num_children),
            None => println!("{}- (children={})", indent, node.num_children),
        }
        for (idx, child) in node.children() {
            let symbol = self.config.alphabet.symbol_at(idx);
            println!("{}  [{}] ->", indent, symbol.escape_ascii());
            self.debug_node(child, depth + 2);
        }
    }
}

impl<V> RwayTrie<V> {
    /// Verify tree integrity - returns list of issues found.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let radix = self.config.alphabet.radix();
        if self.root.children.len() != radix {
            issues.push(format!(
                "root has {} slots, alphabet radix is {}",
                self.root.children.len(),
                radix
            ));
        }

        let mut values = 0usize;
        let mut nodes = 0usize;
        let mut stack: Vec<(&Node<V>, Vec<u8>)> = vec![(&*self.root, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            nodes += 1;
            if node.value.is_some() {
                values += 1;
            }

            if !path.is_empty() && node.is_dead_end() {
                issues.push(format!(
                    "dead-end node at {:?}",
                    String::from_utf8_lossy(&path)
                ));
            }
            if node.children.len() != radix {
                issues.push(format!(
                    "node at {:?} has {} slots (radix {})",
                    String::from_utf8_lossy(&path),
                    node.children.len(),
                    radix
                ));
            }

            let actual = node.children.iter().filter(|c| c.is_some()).count();
            if actual != node.num_children as usize {
                issues.push(format!(
                    "node at {:?} has {} Some children but num_children={}",
                    String::from_utf8_lossy(&path),
                    actual,
                    node.num_children
                ));
            }

            for (idx, child) in node.children() {
                let mut child_path = path.clone();
                child_path.push(self.config.alphabet.symbol_at(idx));
                stack.push((child, child_path));
            }
        }

        if values != self.size {
            issues.push(format!("{} values stored but len={}", values, self.size));
        }
        if nodes != self.nodes {
            issues.push(format!(
                "{} nodes reachable but node_count={}",
                nodes, self.nodes
            ));
        }
        issues
    }
}
