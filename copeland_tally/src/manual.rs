/*!

This is the long-form manual for `copeland_tally` and the `copeland` program.

## Ballot files

Each ballot is a plain text file with one alternative per line, from the most
preferred to the least preferred:

```text
Alice
Charlie
Bob
```

Leading and trailing whitespace is removed and blank lines are ignored.
By default, all the names are converted to upper case before being counted, so
that `alice` and `Alice` designate the same alternative. This can be turned off
with `--normalize-case false`.

A ballot must rank every alternative exactly once. A ballot that is too short
or too long, that names an unknown alternative, that forgets an alternative or
that repeats one is rejected as a whole. By default the first rejected ballot
stops the count. With `--skip-errors`, rejected ballots are reported and the
count continues without them.

## Alternatives

The alternatives are read from the file passed with `--names`, in the same
format as a ballot. If no such file is given, the alternatives are taken from
the first ballot file found.

## Running a count

```bash
copeland --names candidates.txt ballots/
```

The arguments are ballot files or directories. Directories are explored
recursively, in alphabetical order.

```text
Registered names:
	ALICE
	BOB
	CHARLIE

Scores:
	Rank 1:
		2	ALICE
	Rank 2:
		0.5	BOB
		0.5	CHARLIE
```

## Scoring

For every pair of alternatives, the count compares how many ballots ranked
each one above the other. An alternative gets:
- `--score-win` points (default 1) against each opponent it beats,
- `--score-tie` points (default 0.5) against each opponent with the same record,
- `--score-loss` points (default 0) against each opponent it loses to.

Alternatives with exactly the same score share the same rank, and are listed
by name.

## Configuration

All the options can also be given in a JSON file with `--config`. Options on
the command line take precedence over the file.

```json
{
  "contestName": "Board election",
  "namesFile": "candidates.txt",
  "ballotSources": ["ballots"],
  "normalizeCase": true,
  "skipErrors": false,
  "scoring": { "win": 1, "tie": 0.5, "loss": 0 }
}
```

Relative paths are resolved from the directory of the configuration file.

## Summary output

`--out` writes a summary of the count in JSON (`--out stdout` prints it).
`--reference` compares the summary with a previously saved one and fails if they
differ, printing the differences.

 */
