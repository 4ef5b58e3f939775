use std::net::IpAddr;

use termtree::Tree;

use crate::output::{format_duration, tree_label};
use crate::probe::ProbeMeta;
use crate::report::{CANCELLED_REASON, Failure, Finding, Miss, ScanReport};

/// Most misses listed under "not found" before the rest are summarized
const MAX_LISTED_MISSES: usize = 20;

fn ip_nodes(ips: &[IpAddr]) -> Vec<Tree<String>> {
    let mut v4 = Vec::new();
    let mut v6 = Vec::new();
    for ip in ips {
        match ip {
            IpAddr::V4(x) => v4.push(x.to_string()),
            IpAddr::V6(x) => v6.push(x.to_string()),
        }
    }
    let mut nodes = Vec::new();
    if !v4.is_empty() {
        let mut a = Tree::new(tree_label("A"));
        a.extend(v4);
        nodes.push(a);
    }
    if !v6.is_empty() {
        let mut aaaa = Tree::new(tree_label("AAAA"));
        aaaa.extend(v6);
        nodes.push(aaaa);
    }
    nodes
}

fn meta_nodes(meta: &ProbeMeta) -> Vec<Tree<String>> {
    match meta {
        ProbeMeta::Port { service, rtt_ms } => {
            let mut nodes = Vec::new();
            if let Some(name) = service {
                nodes.push(Tree::new(format!("service: {}", name)));
            }
            nodes.push(Tree::new(format!("rtt: {}ms", rtt_ms)));
            nodes
        }
        ProbeMeta::Http {
            url,
            status,
            size,
            content_type,
        } => vec![
            Tree::new(format!("url: {}", url)),
            Tree::new(format!("status: {}", status)),
            Tree::new(format!("size: {}", size)),
            Tree::new(format!("type: {}", content_type)),
        ],
        ProbeMeta::Dns {
            name,
            ips,
            http_status,
            title,
        } => {
            let mut nodes = vec![Tree::new(format!("name: {}", name))];
            nodes.extend(ip_nodes(ips));
            if let Some(status) = http_status {
                nodes.push(Tree::new(format!("http: {}", status)));
            }
            if let Some(title) = title {
                nodes.push(Tree::new(format!("title: {}", title)));
            }
            nodes
        }
    }
}

fn found_node(found: &[Finding]) -> Tree<String> {
    let mut node = Tree::new(tree_label(format!("found ({})", found.len())));
    for f in found {
        let mut item = Tree::new(f.candidate.to_string());
        item.extend(meta_nodes(&f.meta));
        node.push(item);
    }
    node
}

fn not_found_node(not_found: &[Miss]) -> Tree<String> {
    let mut node = Tree::new(tree_label(format!("not found ({})", not_found.len())));
    for m in not_found.iter().take(MAX_LISTED_MISSES) {
        let label = match m.meta.as_ref().and_then(|meta| meta.http_status()) {
            Some(status) => format!("{} ({})", m.candidate, status),
            None => m.candidate.to_string(),
        };
        node.push(Tree::new(label));
    }
    if not_found.len() > MAX_LISTED_MISSES {
        node.push(Tree::new(format!(
            "... {} more",
            not_found.len() - MAX_LISTED_MISSES
        )));
    }
    node
}

fn errors_node(errors: &[Failure]) -> Tree<String> {
    let mut node = Tree::new(tree_label(format!("errors ({})", errors.len())));
    let cancelled = errors.iter().filter(|f| f.reason == CANCELLED_REASON).count();
    for f in errors.iter().filter(|f| f.reason != CANCELLED_REASON) {
        node.push(Tree::new(format!("{}: {}", f.candidate, f.reason)));
    }
    if cancelled > 0 {
        node.push(Tree::new(format!("{} candidate(s) {}", cancelled, CANCELLED_REASON)));
    }
    node
}

/// Build the tree view of a report.
pub fn report_tree(rep: &ScanReport) -> Tree<String> {
    let summary = rep.summary();
    let mut root = Tree::new(format!(
        "{} scan of {} - {} (elapsed: {})",
        rep.meta.kind,
        rep.meta.target,
        rep.state.as_str(),
        format_duration(rep.scan_time)
    ));

    let mut summary_node = Tree::new(tree_label("summary"));
    summary_node.push(Tree::new(format!("candidates: {}", summary.total)));
    if rep.truncated {
        summary_node.push(Tree::new(format!(
            "truncated: {} requested",
            rep.requested_candidates
        )));
    }
    summary_node.push(Tree::new(format!("found: {}", summary.found)));
    summary_node.push(Tree::new(format!("not found: {}", summary.not_found)));
    summary_node.push(Tree::new(format!("errors: {}", summary.errors)));
    if rep.wildcard {
        summary_node.push(Tree::new(tree_label("wildcard DNS: yes")));
    }
    root.push(summary_node);

    root.push(found_node(&rep.found));
    if !rep.not_found.is_empty() {
        root.push(not_found_node(&rep.not_found));
    }
    if !rep.errors.is_empty() {
        root.push(errors_node(&rep.errors));
    }
    root
}

/// Print a report as a tree.
pub fn print_report_tree(rep: &ScanReport) {
    println!("Scan report");
    println!("{}", report_tree(rep));
}
