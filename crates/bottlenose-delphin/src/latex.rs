//! LaTeX rendering of DMRS as `tikz-dependency` diagrams.

use std::fmt;

use crate::dmrs::{Dmrs, EQ_POST};
use crate::mrs::RSTR;

const PREAMBLE: &str = r"\documentclass{standalone}

\usepackage{tikz-dependency}
\usepackage{relsize}

%%%
%%% style for dmrs graph
%%%
\depstyle{dmrs}{edge unit distance=1.5ex,
  label style={above, scale=.9, opacity=0, text opacity=1},
  baseline={([yshift=-0.7\baselineskip]current bounding box.north)}}
%%% set text opacity=0 to hide text, opacity = 0 to hide box
\depstyle{root}{edge unit distance=3ex, label style={opacity=1}}
\depstyle{arg}{edge above}
\depstyle{rstr}{edge below, dotted, label style={text opacity=1}}
\depstyle{eq}{edge below, label style={text opacity=1}}
\depstyle{icons}{edge below, dashed}
\providecommand{\named}{}
\renewcommand{\named}{named}

%%% styles for predicates and roles (from mrs.sty)
\providecommand{\spred}{}
\renewcommand{\spred}[1]{\mbox{\textsf{#1}}}
\providecommand{\srl}{}
\renewcommand{\srl}[1]{\mbox{\textsf{\smaller #1}}}
%%%

\begin{document}
";

/// Render a standalone LaTeX document drawing `dmrs` as a dependency graph.
///
/// Nodes are laid out in predication order. Restrictions are drawn dotted
/// below the text, `EQ` links solid below it, and every other argument
/// above it.
pub fn dmrs_tikz_dependency(dmrs: &Dmrs) -> String {
    TikzDependency(dmrs).to_string()
}

/// `Display` adapter behind [`dmrs_tikz_dependency`].
pub struct TikzDependency<'a>(pub &'a Dmrs);

impl fmt::Display for TikzDependency<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dmrs = self.0;
        f.write_str(PREAMBLE)?;
        writeln!(f, "\\begin{{dependency}}[dmrs]")?;
        writeln!(f, "  \\begin{{deptext}}[column sep=10pt]")?;
        let last = dmrs.nodes.len().saturating_sub(1);
        for (i, node) in dmrs.nodes.iter().enumerate() {
            write!(f, "    \\spred{{{}}}", escape(&node.predicate))?;
            if let Some(carg) = &node.carg {
                write!(f, "({})", escape(carg))?;
            }
            let sep = if i == last { "\\\\" } else { "\\&" };
            writeln!(f, " {sep} % node {}", i + 1)?;
        }
        writeln!(f, "  \\end{{deptext}}")?;

        let position = |nodeid: i64| {
            dmrs.nodes
                .iter()
                .position(|n| n.nodeid == nodeid)
                .map(|p| p + 1)
        };
        if let Some(top) = dmrs.top.and_then(position) {
            writeln!(f, "  \\deproot[root]{{{top}}}{{\\srl{{TOP}}}}")?;
        }
        for link in &dmrs.links {
            let (Some(from), Some(to)) = (position(link.from), position(link.to)) else {
                continue;
            };
            let style = if link.rargname == RSTR {
                "rstr"
            } else if link.post == EQ_POST {
                "eq"
            } else {
                "arg"
            };
            writeln!(
                f,
                "  \\depedge[{style}]{{{from}}}{{{to}}}{{\\srl{{{}}}}}",
                escape(&link.label())
            )?;
        }
        f.write_str("\\end{dependency}\n\n\\end{document}\n")
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
